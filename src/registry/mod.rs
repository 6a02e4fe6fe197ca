//! Position and victim registry
//!
//! Last-write-wins store of agent positions, victim positions and victim
//! status, with a change event for every write.

mod manager;
mod messages;

pub use manager::PositionRegistry;
pub use messages::{RegistryCommand, RegistrySnapshot};
