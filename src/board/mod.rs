//! Task board with actor pattern
//!
//! TaskBoard owns all task records and agent capabilities, and processes
//! messages via channels. Completing a task derives its follow-up tasks in
//! the same serialized step, which drives the mission forward:
//! scout → monitor + deliver buoy → shine torch → rescue.

mod derivation;
mod manager;
mod messages;

pub use derivation::{FollowUp, derive_follow_ups, follow_up_id, follow_ups_for};
pub use manager::TaskBoard;
pub use messages::{BoardCommand, BoardStats, Completion};
