//! PositionRegistry - actor that owns agent and victim positions

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::domain::{Position, VictimStatus};
use crate::error::{CoordError, CoordResponse};
use crate::events::{EventEmitter, MissionEvent};

use super::messages::{RegistryCommand, RegistrySnapshot};

/// Handle to send commands to the PositionRegistry
#[derive(Clone)]
pub struct PositionRegistry {
    tx: mpsc::Sender<RegistryCommand>,
}

impl PositionRegistry {
    /// Spawn a new PositionRegistry actor
    pub fn spawn(channel_buffer: usize, events: EventEmitter) -> Self {
        debug!(channel_buffer, "PositionRegistry::spawn: called");
        let (tx, rx) = mpsc::channel(channel_buffer);
        tokio::spawn(actor_loop(RegistrySnapshot::default(), events, rx));
        info!("PositionRegistry spawned");
        Self { tx }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> RegistryCommand) -> CoordResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| CoordError::ChannelClosed)?;
        reply_rx.await.map_err(|_| CoordError::ChannelClosed)
    }

    /// Record an agent's latest position
    pub async fn update_position(&self, agent_id: &str, x: f64, y: f64) -> CoordResponse<()> {
        debug!(%agent_id, x, y, "update_position: called");
        self.request(|reply| RegistryCommand::UpdatePosition {
            agent_id: agent_id.to_string(),
            position: Position::new(x, y),
            reply,
        })
        .await
    }

    /// Record a victim sighting; resets its status to discovered
    pub async fn report_victim(&self, victim_id: &str, x: f64, y: f64) -> CoordResponse<()> {
        debug!(%victim_id, x, y, "report_victim: called");
        self.request(|reply| RegistryCommand::ReportVictim {
            victim_id: victim_id.to_string(),
            position: Position::new(x, y),
            reply,
        })
        .await
    }

    /// Overwrite a victim's status (the victim need not have been reported)
    pub async fn update_victim_status(&self, victim_id: &str, status: VictimStatus) -> CoordResponse<()> {
        debug!(%victim_id, %status, "update_victim_status: called");
        self.request(|reply| RegistryCommand::UpdateVictimStatus {
            victim_id: victim_id.to_string(),
            status,
            reply,
        })
        .await
    }

    pub async fn agent_position(&self, agent_id: &str) -> CoordResponse<Option<Position>> {
        debug!(%agent_id, "agent_position: called");
        self.request(|reply| RegistryCommand::GetAgentPosition {
            agent_id: agent_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn victim_position(&self, victim_id: &str) -> CoordResponse<Option<Position>> {
        debug!(%victim_id, "victim_position: called");
        self.request(|reply| RegistryCommand::GetVictimPosition {
            victim_id: victim_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn victim_status(&self, victim_id: &str) -> CoordResponse<Option<VictimStatus>> {
        debug!(%victim_id, "victim_status: called");
        self.request(|reply| RegistryCommand::GetVictimStatus {
            victim_id: victim_id.to_string(),
            reply,
        })
        .await
    }

    /// Owned copy of all positions and statuses
    pub async fn snapshot(&self) -> CoordResponse<RegistrySnapshot> {
        debug!("snapshot: called");
        self.request(|reply| RegistryCommand::Snapshot { reply }).await
    }

    /// Number of distinct victims reported so far
    pub async fn victims_found(&self) -> CoordResponse<usize> {
        debug!("victims_found: called");
        self.request(|reply| RegistryCommand::VictimsFound { reply }).await
    }

    /// Shutdown the PositionRegistry
    pub async fn shutdown(&self) -> CoordResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(RegistryCommand::Shutdown)
            .await
            .map_err(|_| CoordError::ChannelClosed)
    }
}

/// The actor loop that owns the registry maps and processes commands
async fn actor_loop(mut state: RegistrySnapshot, events: EventEmitter, mut rx: mpsc::Receiver<RegistryCommand>) {
    debug!("PositionRegistry actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            RegistryCommand::UpdatePosition {
                agent_id,
                position,
                reply,
            } => {
                state.agent_positions.insert(agent_id.clone(), position);
                events.emit(MissionEvent::PositionUpdated {
                    agent_id,
                    x: position.x,
                    y: position.y,
                });
                let _ = reply.send(());
            }
            RegistryCommand::ReportVictim {
                victim_id,
                position,
                reply,
            } => {
                debug!(%victim_id, "actor_loop: ReportVictim command");
                state.victim_positions.insert(victim_id.clone(), position);
                state.victim_status.insert(victim_id.clone(), VictimStatus::Discovered);
                events.emit(MissionEvent::VictimDiscovered {
                    victim_id,
                    x: position.x,
                    y: position.y,
                });
                let _ = reply.send(());
            }
            RegistryCommand::UpdateVictimStatus {
                victim_id,
                status,
                reply,
            } => {
                debug!(%victim_id, %status, "actor_loop: UpdateVictimStatus command");
                state.victim_status.insert(victim_id.clone(), status);
                events.emit(MissionEvent::VictimStatusUpdated { victim_id, status });
                let _ = reply.send(());
            }
            RegistryCommand::GetAgentPosition { agent_id, reply } => {
                let _ = reply.send(state.agent_positions.get(&agent_id).copied());
            }
            RegistryCommand::GetVictimPosition { victim_id, reply } => {
                let _ = reply.send(state.victim_positions.get(&victim_id).copied());
            }
            RegistryCommand::GetVictimStatus { victim_id, reply } => {
                let _ = reply.send(state.victim_status.get(&victim_id).copied());
            }
            RegistryCommand::Snapshot { reply } => {
                let _ = reply.send(state.clone());
            }
            RegistryCommand::VictimsFound { reply } => {
                let _ = reply.send(state.victim_positions.len());
            }
            RegistryCommand::Shutdown => {
                info!("PositionRegistry shutting down");
                break;
            }
        }
    }

    debug!("PositionRegistry actor stopped");
}
