//! Position registry messages

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::oneshot;

use crate::domain::{Position, VictimStatus};

/// Owned copy of everything the registry knows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    pub agent_positions: HashMap<String, Position>,
    pub victim_positions: HashMap<String, Position>,
    pub victim_status: HashMap<String, VictimStatus>,
}

/// Commands sent to the PositionRegistry actor
#[derive(Debug)]
pub enum RegistryCommand {
    UpdatePosition {
        agent_id: String,
        position: Position,
        reply: oneshot::Sender<()>,
    },
    ReportVictim {
        victim_id: String,
        position: Position,
        reply: oneshot::Sender<()>,
    },
    UpdateVictimStatus {
        victim_id: String,
        status: VictimStatus,
        reply: oneshot::Sender<()>,
    },

    // Queries
    GetAgentPosition {
        agent_id: String,
        reply: oneshot::Sender<Option<Position>>,
    },
    GetVictimPosition {
        victim_id: String,
        reply: oneshot::Sender<Option<Position>>,
    },
    GetVictimStatus {
        victim_id: String,
        reply: oneshot::Sender<Option<VictimStatus>>,
    },
    Snapshot {
        reply: oneshot::Sender<RegistrySnapshot>,
    },
    VictimsFound {
        reply: oneshot::Sender<usize>,
    },

    Shutdown,
}
