//! Domain types for the rescue mission
//!
//! Core domain types: Task, Position, VictimStatus.
//! Tasks are retained for the whole mission as history; they are never deleted.

mod position;
mod task;
mod victim;

pub use position::Position;
pub use task::{Task, TaskStatus, TaskType};
pub use victim::VictimStatus;

/// Current time in Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
