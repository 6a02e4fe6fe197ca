//! Rescue coordinator messages

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::oneshot;

/// Owned copy of the rescue coordinator's state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RescueSnapshot {
    /// victim id -> rescuer id, while the rescue is in progress
    pub rescue_operations: HashMap<String, String>,
    /// agent id -> carrying a buoy
    pub buoy_inventory: HashMap<String, bool>,
}

/// Commands sent to the RescueCoordinator actor
#[derive(Debug)]
pub enum RescueCommand {
    RegisterAgent {
        agent_id: String,
        has_buoy: bool,
        reply: oneshot::Sender<()>,
    },
    DropBuoy {
        agent_id: String,
        victim_id: String,
        reply: oneshot::Sender<bool>,
    },
    StartRescue {
        victim_id: String,
        rescuer_id: String,
        reply: oneshot::Sender<()>,
    },
    FinishRescue {
        victim_id: String,
        reply: oneshot::Sender<Option<String>>,
    },

    // Queries
    HasBuoy {
        agent_id: String,
        reply: oneshot::Sender<bool>,
    },
    GetRescuer {
        victim_id: String,
        reply: oneshot::Sender<Option<String>>,
    },
    Snapshot {
        reply: oneshot::Sender<RescueSnapshot>,
    },

    Shutdown,
}
