//! RescueCoordinator - actor that owns rescue records and buoy inventory

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::{CoordError, CoordResponse};
use crate::events::{EventEmitter, MissionEvent};

use super::messages::{RescueCommand, RescueSnapshot};

/// Handle to send commands to the RescueCoordinator
#[derive(Clone)]
pub struct RescueCoordinator {
    tx: mpsc::Sender<RescueCommand>,
}

impl RescueCoordinator {
    /// Spawn a new RescueCoordinator actor
    pub fn spawn(channel_buffer: usize, events: EventEmitter) -> Self {
        debug!(channel_buffer, "RescueCoordinator::spawn: called");
        let (tx, rx) = mpsc::channel(channel_buffer);
        tokio::spawn(actor_loop(RescueSnapshot::default(), events, rx));
        info!("RescueCoordinator spawned");
        Self { tx }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> RescueCommand) -> CoordResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| CoordError::ChannelClosed)?;
        reply_rx.await.map_err(|_| CoordError::ChannelClosed)
    }

    /// Register an agent and whether it is carrying a buoy (overwrites)
    pub async fn register_agent(&self, agent_id: &str, has_buoy: bool) -> CoordResponse<()> {
        debug!(%agent_id, has_buoy, "register_agent: called");
        self.request(|reply| RescueCommand::RegisterAgent {
            agent_id: agent_id.to_string(),
            has_buoy,
            reply,
        })
        .await
    }

    /// Drop the agent's buoy for a victim
    ///
    /// Returns false, without changing anything, when the agent has no buoy
    /// or was never registered.
    pub async fn drop_buoy(&self, agent_id: &str, victim_id: &str) -> CoordResponse<bool> {
        debug!(%agent_id, %victim_id, "drop_buoy: called");
        self.request(|reply| RescueCommand::DropBuoy {
            agent_id: agent_id.to_string(),
            victim_id: victim_id.to_string(),
            reply,
        })
        .await
    }

    /// Record that a rescuer is handling a victim
    pub async fn start_rescue(&self, victim_id: &str, rescuer_id: &str) -> CoordResponse<()> {
        debug!(%victim_id, %rescuer_id, "start_rescue: called");
        self.request(|reply| RescueCommand::StartRescue {
            victim_id: victim_id.to_string(),
            rescuer_id: rescuer_id.to_string(),
            reply,
        })
        .await
    }

    /// Remove a victim's in-progress rescue record, returning the rescuer
    pub async fn finish_rescue(&self, victim_id: &str) -> CoordResponse<Option<String>> {
        debug!(%victim_id, "finish_rescue: called");
        self.request(|reply| RescueCommand::FinishRescue {
            victim_id: victim_id.to_string(),
            reply,
        })
        .await
    }

    /// Whether the agent currently carries a buoy (unknown agents do not)
    pub async fn has_buoy(&self, agent_id: &str) -> CoordResponse<bool> {
        debug!(%agent_id, "has_buoy: called");
        self.request(|reply| RescueCommand::HasBuoy {
            agent_id: agent_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn rescuer_for(&self, victim_id: &str) -> CoordResponse<Option<String>> {
        debug!(%victim_id, "rescuer_for: called");
        self.request(|reply| RescueCommand::GetRescuer {
            victim_id: victim_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn snapshot(&self) -> CoordResponse<RescueSnapshot> {
        debug!("snapshot: called");
        self.request(|reply| RescueCommand::Snapshot { reply }).await
    }

    /// Shutdown the RescueCoordinator
    pub async fn shutdown(&self) -> CoordResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(RescueCommand::Shutdown)
            .await
            .map_err(|_| CoordError::ChannelClosed)
    }
}

/// The actor loop that owns the rescue maps and processes commands
async fn actor_loop(mut state: RescueSnapshot, events: EventEmitter, mut rx: mpsc::Receiver<RescueCommand>) {
    debug!("RescueCoordinator actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            RescueCommand::RegisterAgent {
                agent_id,
                has_buoy,
                reply,
            } => {
                debug!(%agent_id, has_buoy, "actor_loop: RegisterAgent command");
                state.buoy_inventory.insert(agent_id.clone(), has_buoy);
                events.emit(MissionEvent::AgentRegistered { agent_id, has_buoy });
                let _ = reply.send(());
            }
            RescueCommand::DropBuoy {
                agent_id,
                victim_id,
                reply,
            } => {
                let dropped = match state.buoy_inventory.get_mut(&agent_id) {
                    Some(carrying) if *carrying => {
                        *carrying = false;
                        true
                    }
                    Some(_) => {
                        debug!(%agent_id, "actor_loop: DropBuoy ignored, no buoy on board");
                        false
                    }
                    None => {
                        warn!(%agent_id, "actor_loop: DropBuoy ignored, agent not registered");
                        false
                    }
                };
                if dropped {
                    events.emit(MissionEvent::BuoyDropped { agent_id, victim_id });
                }
                let _ = reply.send(dropped);
            }
            RescueCommand::StartRescue {
                victim_id,
                rescuer_id,
                reply,
            } => {
                debug!(%victim_id, %rescuer_id, "actor_loop: StartRescue command");
                state.rescue_operations.insert(victim_id.clone(), rescuer_id.clone());
                events.emit(MissionEvent::RescueStarted { victim_id, rescuer_id });
                let _ = reply.send(());
            }
            RescueCommand::FinishRescue { victim_id, reply } => {
                let _ = reply.send(state.rescue_operations.remove(&victim_id));
            }
            RescueCommand::HasBuoy { agent_id, reply } => {
                let _ = reply.send(state.buoy_inventory.get(&agent_id).copied().unwrap_or(false));
            }
            RescueCommand::GetRescuer { victim_id, reply } => {
                let _ = reply.send(state.rescue_operations.get(&victim_id).cloned());
            }
            RescueCommand::Snapshot { reply } => {
                let _ = reply.send(state.clone());
            }
            RescueCommand::Shutdown => {
                info!("RescueCoordinator shutting down");
                break;
            }
        }
    }

    debug!("RescueCoordinator actor stopped");
}
