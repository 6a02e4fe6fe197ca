//! Error types for the coordination components

use thiserror::Error;

use crate::domain::{TaskStatus, TaskType};

/// Errors returned by the task board, registry, rescue coordinator and goal tracker
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Task already exists: {0}")]
    DuplicateTask(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid task type: {0}")]
    InvalidType(String),

    #[error("Task {task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("Agent {agent_id} is not registered for {task_type} tasks")]
    CapabilityMismatch { agent_id: String, task_type: TaskType },

    #[error("Invalid victim status: {0}")]
    InvalidVictimStatus(String),

    #[error("Channel closed")]
    ChannelClosed,
}

/// Response type for coordination operations
pub type CoordResponse<T> = Result<T, CoordError>;

impl CoordError {
    /// Check if this is a missing-entity error
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoordError::TaskNotFound(_))
    }

    /// Check if the component behind the handle has shut down
    pub fn is_closed(&self) -> bool {
        matches!(self, CoordError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoordError::DuplicateTask("S1".to_string()).to_string(),
            "Task already exists: S1"
        );

        let err = CoordError::InvalidTransition {
            task_id: "S1".to_string(),
            from: TaskStatus::Completed,
            to: TaskStatus::Assigned,
        };
        assert_eq!(err.to_string(), "Task S1 cannot move from COMPLETED to ASSIGNED");

        let err = CoordError::CapabilityMismatch {
            agent_id: "boat1".to_string(),
            task_type: TaskType::Scout,
        };
        assert!(err.to_string().contains("SCOUT"));
    }

    #[test]
    fn test_predicates() {
        assert!(CoordError::TaskNotFound("x".to_string()).is_not_found());
        assert!(!CoordError::DuplicateTask("x".to_string()).is_not_found());
        assert!(CoordError::ChannelClosed.is_closed());
    }
}
