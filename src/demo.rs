//! In-process mission walkthrough
//!
//! Drives every component through the full task chain for each victim:
//! scout, then monitor and buoy delivery, then torch and rescue.

use eyre::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::board::BoardStats;
use crate::config::Config;
use crate::domain::{Position, TaskType, VictimStatus};
use crate::events::{MissionEvent, spawn_event_logger};
use crate::goal::GoalProgress;
use crate::mission::Mission;

const UAVS: &[&str] = &["uav_1", "uav_2", "uav_3"];
/// Boats and the harbour each one starts from
const BOATS: &[(&str, Position)] = &[
    ("boat_1", Position { x: 0.0, y: 100.0 }),
    ("boat_2", Position { x: 0.0, y: 700.0 }),
];
const UAV_SKILLS: &[TaskType] = &[
    TaskType::Scout,
    TaskType::DeliverBuoy,
    TaskType::MonitorVictim,
    TaskType::ShineTorch,
];

/// Demo knobs layered over the loaded config
#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub victims: u32,
    pub enforce_capabilities: bool,
}

/// What the walkthrough produced
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub events: Vec<MissionEvent>,
    pub progress: GoalProgress,
    pub stats: BoardStats,
    pub victims_found: usize,
}

/// Where the scout for victim `n` finds it
pub fn victim_location(n: u32) -> Position {
    Position::new(150.0 + 40.0 * n as f64, 100.0 + 150.0 * (n % 5) as f64)
}

/// Run a complete mission and collect every event it emitted
pub async fn run_demo(config: &Config, options: &DemoOptions) -> Result<DemoReport> {
    debug!(?options, "run_demo: called");
    let mut config = config.clone();
    config.mission.total_victims = options.victims;
    config.board.enforce_capabilities = options.enforce_capabilities;

    let mission = Mission::spawn(&config);
    let collector = tokio::spawn(collect_events(mission.subscribe()));
    let logger = config
        .events
        .log_file
        .as_ref()
        .map(|path| spawn_event_logger(mission.bus(), path));

    mission.initialize_goal(options.victims).await?;
    register_fleet(&mission).await?;

    for n in 1..=options.victims {
        rescue_victim(&mission, n)
            .await
            .context(format!("Failed to rescue victim {}", n))?;
    }

    let progress = mission.progress().await?;
    let stats = mission.board_stats().await?;
    let victims_found = mission.registry.victims_found().await?;
    info!(
        rescued = progress.rescued_victims,
        total = progress.total_victims,
        "demo finished"
    );

    // Dropping every sender closes the bus so the collector and logger finish
    mission.shutdown().await?;
    drop(mission);
    let events = collector.await.context("Event collector failed")?;
    if let Some(logger) = logger {
        logger.await.context("Event logger failed")?;
    }

    Ok(DemoReport {
        events,
        progress,
        stats,
        victims_found,
    })
}

async fn collect_events(mut rx: broadcast::Receiver<MissionEvent>) -> Vec<MissionEvent> {
    let mut events = Vec::new();
    loop {
        match rx.recv().await {
            Ok(event) => events.push(event),
            Err(RecvError::Lagged(n)) => warn!(skipped = n, "demo event collector lagged"),
            Err(RecvError::Closed) => break,
        }
    }
    events
}

async fn register_fleet(mission: &Mission) -> Result<()> {
    for uav in UAVS {
        mission.register_agent(uav, true).await?;
        for skill in UAV_SKILLS {
            mission.register_capability(uav, *skill).await?;
        }
    }
    for (boat, home) in BOATS {
        mission.register_agent(boat, false).await?;
        mission.register_capability(boat, TaskType::Rescue).await?;
        mission.update_position(boat, home.x, home.y).await?;
    }
    Ok(())
}

/// Closest candidate to `target`; ties go to the earlier candidate
pub fn nearest<'a>(candidates: &[(&'a str, Position)], target: Position) -> Option<&'a str> {
    candidates
        .iter()
        .min_by(|a, b| a.1.distance_to(&target).total_cmp(&b.1.distance_to(&target)))
        .map(|(id, _)| *id)
}

/// Boat whose last reported position is closest to the victim
async fn nearest_boat(mission: &Mission, target: Position) -> Result<&'static str> {
    let mut reported = Vec::with_capacity(BOATS.len());
    for (boat, _) in BOATS {
        if let Some(at) = mission.registry.agent_position(boat).await? {
            reported.push((*boat, at));
        }
    }
    nearest(&reported, target).ok_or_else(|| eyre::eyre!("no boat has reported a position"))
}

async fn rescue_victim(mission: &Mission, n: u32) -> Result<()> {
    let victim_id = format!("V{}", n);
    let scout_id = format!("S{}", n);
    let location = victim_location(n);
    let scout = UAVS[(n as usize - 1) % UAVS.len()];
    let helper = UAVS[n as usize % UAVS.len()];

    // Scout finds the victim
    mission.create_task(&scout_id, TaskType::Scout, location, 1.0).await?;
    mission.assign_task(&scout_id, scout).await?;
    mission.update_position(scout, location.x, location.y).await?;
    mission.report_victim(&victim_id, location.x, location.y).await?;
    let scouted = mission.complete_task(&scout_id).await?;

    // Follow-ups come back highest priority first: monitor, then delivery
    let mut monitor_id = None;
    let mut delivery_id = None;
    for task in &scouted.derived {
        match task.task_type {
            TaskType::MonitorVictim => monitor_id = Some(task.id.clone()),
            TaskType::DeliverBuoy => delivery_id = Some(task.id.clone()),
            _ => {}
        }
    }
    let monitor_id = monitor_id.ok_or_else(|| eyre::eyre!("scout {} derived no monitor task", scout_id))?;
    let delivery_id = delivery_id.ok_or_else(|| eyre::eyre!("scout {} derived no delivery task", scout_id))?;

    mission.assign_task(&monitor_id, scout).await?;
    mission
        .update_victim_status(&victim_id, VictimStatus::Monitored)
        .await?;
    let monitored = mission.complete_task(&monitor_id).await?;

    mission.assign_task(&delivery_id, helper).await?;
    mission.update_position(helper, location.x, location.y).await?;
    if !mission.drop_buoy(helper, &victim_id).await? {
        // Resupply and retry once
        mission.register_agent(helper, true).await?;
        mission.drop_buoy(helper, &victim_id).await?;
    }
    let delivered = mission.complete_task(&delivery_id).await?;

    for torch in &delivered.derived {
        mission.assign_task(&torch.id, helper).await?;
        mission.complete_task(&torch.id).await?;
    }

    for rescue in &monitored.derived {
        let boat = nearest_boat(mission, location).await?;
        mission.assign_task(&rescue.id, boat).await?;
        mission.update_position(boat, location.x, location.y).await?;
        mission.start_rescue(&victim_id, boat).await?;
        mission.complete_task(&rescue.id).await?;
    }

    // Buoy is spent; put a fresh one on board for the next victim
    mission.register_agent(helper, true).await?;
    mission.victim_rescued(&victim_id).await?;
    Ok(())
}
