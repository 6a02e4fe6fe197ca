//! GoalTracker - actor that counts rescued victims against the mission target

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::{CoordError, CoordResponse};
use crate::events::{EventEmitter, MissionEvent};

use super::messages::{GoalCommand, GoalProgress};

/// Handle to send commands to the GoalTracker
#[derive(Clone)]
pub struct GoalTracker {
    tx: mpsc::Sender<GoalCommand>,
}

impl GoalTracker {
    /// Spawn a new GoalTracker actor targeting `total_victims`
    ///
    /// Spawning does not emit `GoalInitialized`; call [`GoalTracker::initialize`]
    /// to announce (or reset) the target.
    pub fn spawn(channel_buffer: usize, total_victims: u32, events: EventEmitter) -> Self {
        debug!(channel_buffer, total_victims, "GoalTracker::spawn: called");
        let (tx, rx) = mpsc::channel(channel_buffer);
        tokio::spawn(actor_loop(GoalProgress::new(total_victims), events, rx));
        info!("GoalTracker spawned");
        Self { tx }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> GoalCommand) -> CoordResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| CoordError::ChannelClosed)?;
        reply_rx.await.map_err(|_| CoordError::ChannelClosed)
    }

    /// Reset the mission: new target, zero rescued, no assignments
    pub async fn initialize(&self, total_victims: u32) -> CoordResponse<()> {
        debug!(total_victims, "initialize: called");
        self.request(|reply| GoalCommand::Initialize { total_victims, reply })
            .await
    }

    pub async fn assign_victim(&self, victim_id: &str, rescuer_id: &str) -> CoordResponse<()> {
        debug!(%victim_id, %rescuer_id, "assign_victim: called");
        self.request(|reply| GoalCommand::AssignVictim {
            victim_id: victim_id.to_string(),
            rescuer_id: rescuer_id.to_string(),
            reply,
        })
        .await
    }

    /// Count a rescue and return the progress after it
    pub async fn victim_rescued(&self, victim_id: &str) -> CoordResponse<GoalProgress> {
        debug!(%victim_id, "victim_rescued: called");
        self.request(|reply| GoalCommand::VictimRescued {
            victim_id: victim_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn get_rescuer_for_victim(&self, victim_id: &str) -> CoordResponse<Option<String>> {
        debug!(%victim_id, "get_rescuer_for_victim: called");
        self.request(|reply| GoalCommand::GetRescuer {
            victim_id: victim_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn progress(&self) -> CoordResponse<GoalProgress> {
        debug!("progress: called");
        self.request(|reply| GoalCommand::Progress { reply }).await
    }

    /// Shutdown the GoalTracker
    pub async fn shutdown(&self) -> CoordResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(GoalCommand::Shutdown)
            .await
            .map_err(|_| CoordError::ChannelClosed)
    }
}

/// Apply one rescue to the progress, emitting the resulting events
fn record_rescue(state: &mut GoalProgress, victim_id: String, events: &EventEmitter) {
    if state.mission_complete {
        warn!(%victim_id, rescued = state.rescued_victims, "victim rescued after mission completion");
    }

    state.assignments.remove(&victim_id);
    state.rescued_victims = (state.rescued_victims + 1).min(state.total_victims);
    events.emit(MissionEvent::VictimRescued {
        victim_id,
        rescued_victims: state.rescued_victims,
    });

    if !state.mission_complete && state.rescued_victims >= state.total_victims {
        state.mission_complete = true;
        info!(
            rescued = state.rescued_victims,
            total = state.total_victims,
            "mission complete"
        );
        events.emit(MissionEvent::MissionCompleted {
            rescued_victims: state.rescued_victims,
            total_victims: state.total_victims,
        });
    }
}

/// The actor loop that owns the goal state and processes commands
async fn actor_loop(mut state: GoalProgress, events: EventEmitter, mut rx: mpsc::Receiver<GoalCommand>) {
    debug!("GoalTracker actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            GoalCommand::Initialize { total_victims, reply } => {
                info!(total_victims, "goal initialized");
                state = GoalProgress::new(total_victims);
                events.emit(MissionEvent::GoalInitialized { total_victims });
                let _ = reply.send(());
            }
            GoalCommand::AssignVictim {
                victim_id,
                rescuer_id,
                reply,
            } => {
                state.assignments.insert(victim_id.clone(), rescuer_id.clone());
                events.emit(MissionEvent::VictimAssigned { victim_id, rescuer_id });
                let _ = reply.send(());
            }
            GoalCommand::VictimRescued { victim_id, reply } => {
                record_rescue(&mut state, victim_id, &events);
                let _ = reply.send(state.clone());
            }
            GoalCommand::GetRescuer { victim_id, reply } => {
                let _ = reply.send(state.assignments.get(&victim_id).cloned());
            }
            GoalCommand::Progress { reply } => {
                let _ = reply.send(state.clone());
            }
            GoalCommand::Shutdown => {
                info!("GoalTracker shutting down");
                break;
            }
        }
    }

    debug!("GoalTracker actor stopped");
}
