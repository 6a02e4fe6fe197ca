//! Mission goal tracking

mod manager;
mod messages;

pub use manager::GoalTracker;
pub use messages::{GoalCommand, GoalProgress};
