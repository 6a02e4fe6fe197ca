//! Goal tracker messages

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::oneshot;

/// Mission progress as seen by the goal tracker
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalProgress {
    pub total_victims: u32,
    pub rescued_victims: u32,
    pub mission_complete: bool,
    /// victim id -> rescuer id, for victims not yet rescued
    pub assignments: HashMap<String, String>,
}

impl GoalProgress {
    pub fn new(total_victims: u32) -> Self {
        Self {
            total_victims,
            ..Default::default()
        }
    }

    /// Victims still waiting for rescue
    pub fn remaining(&self) -> u32 {
        self.total_victims.saturating_sub(self.rescued_victims)
    }
}

/// Commands sent to the GoalTracker actor
#[derive(Debug)]
pub enum GoalCommand {
    Initialize {
        total_victims: u32,
        reply: oneshot::Sender<()>,
    },
    AssignVictim {
        victim_id: String,
        rescuer_id: String,
        reply: oneshot::Sender<()>,
    },
    VictimRescued {
        victim_id: String,
        reply: oneshot::Sender<GoalProgress>,
    },

    // Queries
    GetRescuer {
        victim_id: String,
        reply: oneshot::Sender<Option<String>>,
    },
    Progress {
        reply: oneshot::Sender<GoalProgress>,
    },

    Shutdown,
}
