//! Event types for mission activity
//!
//! These events represent all observable state changes:
//! - Task board (creation, assignment, completion, capabilities)
//! - Registry (agent positions, victim discovery and status)
//! - Rescue coordination (agents, buoys, rescues)
//! - Mission goal (assignments, rescues, completion)
//! - Simulator commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Position, TaskType, VictimStatus};

/// Core event enum - the vocabulary of mission activity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MissionEvent {
    // === Task board ===
    TaskCreated {
        task_id: String,
        task_type: TaskType,
        location: Position,
        priority: f64,
    },
    TaskAssigned {
        task_id: String,
        agent_id: String,
    },
    TaskCompleted {
        task_id: String,
    },
    CapabilityRegistered {
        agent_id: String,
        capability: TaskType,
    },

    // === Registry ===
    PositionUpdated {
        agent_id: String,
        x: f64,
        y: f64,
    },
    VictimDiscovered {
        victim_id: String,
        x: f64,
        y: f64,
    },
    VictimStatusUpdated {
        victim_id: String,
        status: VictimStatus,
    },

    // === Rescue coordination ===
    AgentRegistered {
        agent_id: String,
        has_buoy: bool,
    },
    BuoyDropped {
        agent_id: String,
        victim_id: String,
    },
    RescueStarted {
        victim_id: String,
        rescuer_id: String,
    },

    // === Mission goal ===
    GoalInitialized {
        total_victims: u32,
    },
    VictimAssigned {
        victim_id: String,
        rescuer_id: String,
    },
    VictimRescued {
        victim_id: String,
        rescued_victims: u32,
    },
    MissionCompleted {
        rescued_victims: u32,
        total_victims: u32,
    },

    // === Simulator ===
    CommandSent {
        agent_id: String,
        command: String,
        success: bool,
    },
}

impl MissionEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            MissionEvent::TaskCreated { .. } => "TaskCreated",
            MissionEvent::TaskAssigned { .. } => "TaskAssigned",
            MissionEvent::TaskCompleted { .. } => "TaskCompleted",
            MissionEvent::CapabilityRegistered { .. } => "CapabilityRegistered",
            MissionEvent::PositionUpdated { .. } => "PositionUpdated",
            MissionEvent::VictimDiscovered { .. } => "VictimDiscovered",
            MissionEvent::VictimStatusUpdated { .. } => "VictimStatusUpdated",
            MissionEvent::AgentRegistered { .. } => "AgentRegistered",
            MissionEvent::BuoyDropped { .. } => "BuoyDropped",
            MissionEvent::RescueStarted { .. } => "RescueStarted",
            MissionEvent::GoalInitialized { .. } => "GoalInitialized",
            MissionEvent::VictimAssigned { .. } => "VictimAssigned",
            MissionEvent::VictimRescued { .. } => "VictimRescued",
            MissionEvent::MissionCompleted { .. } => "MissionCompleted",
            MissionEvent::CommandSent { .. } => "CommandSent",
        }
    }

    /// Name of the component that emits this event
    pub fn source(&self) -> &'static str {
        match self {
            MissionEvent::TaskCreated { .. }
            | MissionEvent::TaskAssigned { .. }
            | MissionEvent::TaskCompleted { .. }
            | MissionEvent::CapabilityRegistered { .. } => "board",
            MissionEvent::PositionUpdated { .. }
            | MissionEvent::VictimDiscovered { .. }
            | MissionEvent::VictimStatusUpdated { .. } => "registry",
            MissionEvent::AgentRegistered { .. }
            | MissionEvent::BuoyDropped { .. }
            | MissionEvent::RescueStarted { .. } => "rescue",
            MissionEvent::GoalInitialized { .. }
            | MissionEvent::VictimAssigned { .. }
            | MissionEvent::VictimRescued { .. }
            | MissionEvent::MissionCompleted { .. } => "goal",
            MissionEvent::CommandSent { .. } => "gateway",
        }
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        match self {
            MissionEvent::TaskCreated {
                task_id,
                task_type,
                location,
                priority,
            } => format!("{} {} at {} (priority {:.1})", task_type, task_id, location, priority),
            MissionEvent::TaskAssigned { task_id, agent_id } => format!("{} -> {}", task_id, agent_id),
            MissionEvent::TaskCompleted { task_id } => task_id.clone(),
            MissionEvent::CapabilityRegistered { agent_id, capability } => format!("{} can {}", agent_id, capability),
            MissionEvent::PositionUpdated { agent_id, x, y } => format!("{} at ({}, {})", agent_id, x, y),
            MissionEvent::VictimDiscovered { victim_id, x, y } => format!("{} at ({}, {})", victim_id, x, y),
            MissionEvent::VictimStatusUpdated { victim_id, status } => format!("{} is {}", victim_id, status),
            MissionEvent::AgentRegistered { agent_id, has_buoy } => format!("{} (buoy: {})", agent_id, has_buoy),
            MissionEvent::BuoyDropped { agent_id, victim_id } => format!("{} dropped buoy for {}", agent_id, victim_id),
            MissionEvent::RescueStarted { victim_id, rescuer_id } => format!("{} rescuing {}", rescuer_id, victim_id),
            MissionEvent::GoalInitialized { total_victims } => format!("{} victims to rescue", total_victims),
            MissionEvent::VictimAssigned { victim_id, rescuer_id } => format!("{} assigned to {}", victim_id, rescuer_id),
            MissionEvent::VictimRescued {
                victim_id,
                rescued_victims,
            } => format!("{} (total rescued: {})", victim_id, rescued_victims),
            MissionEvent::MissionCompleted {
                rescued_victims,
                total_victims,
            } => format!("{}/{} victims rescued", rescued_victims, total_victims),
            MissionEvent::CommandSent {
                agent_id,
                command,
                success,
            } => format!("{} {} ({})", agent_id, command, if *success { "ok" } else { "failed" }),
        }
    }
}

/// A timestamped event log entry for file persistence
///
/// Delivery is at-least-once, so every entry carries a unique id that
/// readers can use to drop duplicates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: String,
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    pub event: MissionEvent,
}

impl EventLogEntry {
    /// Create a new log entry with current timestamp
    pub fn new(event: MissionEvent) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
