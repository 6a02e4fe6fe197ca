//! Task board messages
//!
//! Commands and replies for the board actor.

use serde::Serialize;
use tokio::sync::oneshot;

use crate::domain::{Position, Task, TaskStatus, TaskType};
use crate::error::CoordResponse;

/// Result of completing a task: the parent and whatever it derived
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub task: Task,
    pub derived: Vec<Task>,
}

/// Task counts by status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub completed: usize,
    pub agents: usize,
}

/// Commands sent to the TaskBoard actor
#[derive(Debug)]
pub enum BoardCommand {
    CreateTask {
        id: String,
        task_type: TaskType,
        location: Position,
        priority: f64,
        reply: oneshot::Sender<CoordResponse<Task>>,
    },
    RegisterCapability {
        agent_id: String,
        capability: TaskType,
        reply: oneshot::Sender<CoordResponse<()>>,
    },
    AssignTask {
        task_id: String,
        agent_id: String,
        reply: oneshot::Sender<CoordResponse<Task>>,
    },
    CompleteTask {
        task_id: String,
        reply: oneshot::Sender<CoordResponse<Completion>>,
    },

    // Queries
    GetTask {
        id: String,
        reply: oneshot::Sender<Option<Task>>,
    },
    ListTasks {
        status_filter: Option<TaskStatus>,
        reply: oneshot::Sender<Vec<Task>>,
    },
    Capabilities {
        agent_id: String,
        reply: oneshot::Sender<Vec<TaskType>>,
    },
    CapableAgents {
        task_type: TaskType,
        reply: oneshot::Sender<Vec<String>>,
    },
    Stats {
        reply: oneshot::Sender<BoardStats>,
    },

    Shutdown,
}
