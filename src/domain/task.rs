//! Task domain type
//!
//! A unit of mission work with a type, location, lifecycle status and
//! optional assignee. Status only moves forward:
//! `Pending -> Assigned -> Completed` (or straight `Pending -> Completed`).

use serde::{Deserialize, Serialize};

use super::{Position, now_ms};
use crate::error::{CoordError, CoordResponse};

/// Kind of work a task represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Scout,
    DeliverBuoy,
    MonitorVictim,
    ShineTorch,
    Rescue,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Scout,
        TaskType::DeliverBuoy,
        TaskType::MonitorVictim,
        TaskType::ShineTorch,
        TaskType::Rescue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scout => "SCOUT",
            Self::DeliverBuoy => "DELIVER_BUOY",
            Self::MonitorVictim => "MONITOR_VICTIM",
            Self::ShineTorch => "SHINE_TORCH",
            Self::Rescue => "RESCUE",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| CoordError::InvalidType(s.to_string()))
    }
}

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Assigned,
    Completed,
}

impl TaskStatus {
    fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Assigned => 1,
            Self::Completed => 2,
        }
    }

    /// Whether moving to `next` goes strictly forward
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Assigned => write!(f, "ASSIGNED"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ASSIGNED" => Ok(Self::Assigned),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// A unit of mission work on the task board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Caller-assigned identifier, unique for the whole mission
    pub id: String,

    #[serde(rename = "type")]
    pub task_type: TaskType,

    pub location: Position,

    pub status: TaskStatus,

    /// Agent the task was assigned to (set once, on assignment)
    pub assigned_to: Option<String>,

    /// Informational only; the board never reorders work by it
    pub priority: f64,

    /// Task whose completion derived this one
    pub parent: Option<String>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Task {
    /// Create a new pending, unassigned task
    pub fn new(id: impl Into<String>, task_type: TaskType, location: Position, priority: f64) -> Self {
        let now = now_ms();
        Self {
            id: id.into(),
            task_type,
            location,
            status: TaskStatus::Pending,
            assigned_to: None,
            priority,
            parent: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the parent and return self (builder pattern)
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Check if the task can no longer change
    pub fn is_terminal(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    fn transition(&mut self, next: TaskStatus) -> CoordResponse<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoordError::InvalidTransition {
                task_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now_ms();
        Ok(())
    }

    /// Move a pending task to Assigned and record the assignee
    pub fn assign(&mut self, agent_id: impl Into<String>) -> CoordResponse<()> {
        if self.status != TaskStatus::Pending {
            return Err(CoordError::InvalidTransition {
                task_id: self.id.clone(),
                from: self.status,
                to: TaskStatus::Assigned,
            });
        }
        self.transition(TaskStatus::Assigned)?;
        self.assigned_to = Some(agent_id.into());
        Ok(())
    }

    /// Move the task to Completed
    pub fn complete(&mut self) -> CoordResponse<()> {
        self.transition(TaskStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scout(id: &str) -> Task {
        Task::new(id, TaskType::Scout, Position::new(0.0, 0.0), 1.0)
    }

    #[test]
    fn test_new_task_is_pending() {
        let task = scout("S1");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.assigned_to.is_none());
        assert!(task.parent.is_none());
        assert!(!task.is_terminal());
    }

    #[test]
    fn test_assign_then_complete() {
        let mut task = scout("S1");
        task.assign("u1").unwrap();
        assert_eq!(task.status, TaskStatus::Assigned);
        assert_eq!(task.assigned_to.as_deref(), Some("u1"));

        task.complete().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.assigned_to.as_deref(), Some("u1"));
        assert!(task.is_terminal());
    }

    #[test]
    fn test_complete_pending_is_forward() {
        let mut task = scout("S1");
        task.complete().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.assigned_to.is_none());
    }

    #[test]
    fn test_reassign_rejected() {
        let mut task = scout("S1");
        task.assign("u1").unwrap();
        let err = task.assign("u2").unwrap_err();
        assert!(matches!(err, CoordError::InvalidTransition { .. }));
        assert_eq!(task.assigned_to.as_deref(), Some("u1"));
    }

    #[test]
    fn test_completed_is_final() {
        let mut task = scout("S1");
        task.complete().unwrap();
        assert!(task.assign("u1").is_err());
        assert!(task.complete().is_err());
        assert!(task.assigned_to.is_none());
    }

    #[test]
    fn test_task_type_parse() {
        assert_eq!("SCOUT".parse::<TaskType>().unwrap(), TaskType::Scout);
        assert_eq!("deliver_buoy".parse::<TaskType>().unwrap(), TaskType::DeliverBuoy);
        assert_eq!("shine-torch".parse::<TaskType>().unwrap(), TaskType::ShineTorch);
        assert_eq!(
            "FLY".parse::<TaskType>(),
            Err(CoordError::InvalidType("FLY".to_string()))
        );
    }

    #[test]
    fn test_task_serde() {
        let task = scout("S1").with_parent("root");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "SCOUT");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["parent"], "root");

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Assign(String),
        Complete,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-z][0-9]".prop_map(Op::Assign),
            Just(Op::Complete),
        ]
    }

    proptest! {
        #[test]
        fn prop_status_never_moves_backwards(ops in proptest::collection::vec(op_strategy(), 0..12)) {
            let mut task = scout("S1");
            let mut first_assignee: Option<String> = None;

            for op in ops {
                let before = task.status;
                let _ = match op {
                    Op::Assign(agent) => task.assign(agent),
                    Op::Complete => task.complete(),
                };
                prop_assert!(before == task.status || before.can_transition_to(task.status));

                if first_assignee.is_none() {
                    first_assignee = task.assigned_to.clone();
                }
                prop_assert_eq!(&task.assigned_to, &first_assignee);
            }
        }
    }
}
