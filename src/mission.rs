//! Mission - one event bus and every coordination actor, wired together
//!
//! The facade exposes each boundary operation by name and runs the
//! sequences that span components. Every single call is atomic within its
//! component; the sequences are not atomic as a whole.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::board::{BoardStats, Completion, TaskBoard};
use crate::config::Config;
use crate::domain::{Position, Task, TaskType, VictimStatus};
use crate::error::CoordResponse;
use crate::events::{EventBus, MissionEvent, create_event_bus};
use crate::goal::{GoalProgress, GoalTracker};
use crate::registry::PositionRegistry;
use crate::rescue::RescueCoordinator;

/// Handles to all coordination actors sharing one event bus
#[derive(Clone)]
pub struct Mission {
    bus: Arc<EventBus>,
    pub board: TaskBoard,
    pub registry: PositionRegistry,
    pub rescue: RescueCoordinator,
    pub goal: GoalTracker,
}

impl Mission {
    /// Spawn every actor; the goal starts at `mission.total-victims`
    pub fn spawn(config: &Config) -> Self {
        debug!(?config, "Mission::spawn: called");
        let bus = create_event_bus(config.events.capacity);
        let buffer = config.board.channel_buffer;

        let mission = Self {
            board: TaskBoard::spawn(&config.board, bus.emitter()),
            registry: PositionRegistry::spawn(buffer, bus.emitter()),
            rescue: RescueCoordinator::spawn(buffer, bus.emitter()),
            goal: GoalTracker::spawn(buffer, config.mission.total_victims, bus.emitter()),
            bus,
        };
        info!(total_victims = config.mission.total_victims, "Mission spawned");
        mission
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MissionEvent> {
        self.bus.subscribe()
    }

    // === Task board ===

    pub async fn create_task(
        &self,
        id: &str,
        task_type: TaskType,
        location: Position,
        priority: f64,
    ) -> CoordResponse<Task> {
        self.board.create_task(id, task_type, location, priority).await
    }

    pub async fn assign_task(&self, task_id: &str, agent_id: &str) -> CoordResponse<Task> {
        self.board.assign_task(task_id, agent_id).await
    }

    pub async fn complete_task(&self, task_id: &str) -> CoordResponse<Completion> {
        self.board.complete_task(task_id).await
    }

    pub async fn register_capability(&self, agent_id: &str, capability: TaskType) -> CoordResponse<()> {
        self.board.register_capability(agent_id, capability).await
    }

    pub async fn board_stats(&self) -> CoordResponse<BoardStats> {
        self.board.stats().await
    }

    // === Registry ===

    pub async fn update_position(&self, agent_id: &str, x: f64, y: f64) -> CoordResponse<()> {
        self.registry.update_position(agent_id, x, y).await
    }

    pub async fn report_victim(&self, victim_id: &str, x: f64, y: f64) -> CoordResponse<()> {
        self.registry.report_victim(victim_id, x, y).await
    }

    pub async fn update_victim_status(&self, victim_id: &str, status: VictimStatus) -> CoordResponse<()> {
        self.registry.update_victim_status(victim_id, status).await
    }

    // === Rescue coordination ===

    pub async fn register_agent(&self, agent_id: &str, has_buoy: bool) -> CoordResponse<()> {
        self.rescue.register_agent(agent_id, has_buoy).await
    }

    pub async fn drop_buoy(&self, agent_id: &str, victim_id: &str) -> CoordResponse<bool> {
        self.rescue.drop_buoy(agent_id, victim_id).await
    }

    /// Record the rescue and assign the victim to the rescuer in the goal
    pub async fn start_rescue(&self, victim_id: &str, rescuer_id: &str) -> CoordResponse<()> {
        debug!(%victim_id, %rescuer_id, "start_rescue: called");
        self.rescue.start_rescue(victim_id, rescuer_id).await?;
        self.goal.assign_victim(victim_id, rescuer_id).await
    }

    // === Goal ===

    pub async fn initialize_goal(&self, total_victims: u32) -> CoordResponse<()> {
        self.goal.initialize(total_victims).await
    }

    pub async fn assign_victim(&self, victim_id: &str, rescuer_id: &str) -> CoordResponse<()> {
        self.goal.assign_victim(victim_id, rescuer_id).await
    }

    /// Count the rescue, close the rescue record and mark the victim rescued
    pub async fn victim_rescued(&self, victim_id: &str) -> CoordResponse<GoalProgress> {
        debug!(%victim_id, "victim_rescued: called");
        let progress = self.goal.victim_rescued(victim_id).await?;
        self.rescue.finish_rescue(victim_id).await?;
        self.registry
            .update_victim_status(victim_id, VictimStatus::Rescued)
            .await?;
        Ok(progress)
    }

    pub async fn get_rescuer_for_victim(&self, victim_id: &str) -> CoordResponse<Option<String>> {
        self.goal.get_rescuer_for_victim(victim_id).await
    }

    pub async fn progress(&self) -> CoordResponse<GoalProgress> {
        self.goal.progress().await
    }

    /// Stop every actor
    pub async fn shutdown(&self) -> CoordResponse<()> {
        debug!("shutdown: called");
        self.board.shutdown().await?;
        self.registry.shutdown().await?;
        self.rescue.shutdown().await?;
        self.goal.shutdown().await?;
        info!("Mission shut down");
        Ok(())
    }
}
