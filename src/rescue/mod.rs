//! Rescue coordination
//!
//! Tracks which rescuer is handling which victim and whether each agent is
//! carrying a buoy. Buoys are single use per registration.

mod manager;
mod messages;

pub use manager::RescueCoordinator;
pub use messages::{RescueCommand, RescueSnapshot};
