//! RescueDaemon - multi-agent sea rescue coordination
//!
//! UAVs scout for victims, monitor them, deliver buoys and shine torches;
//! boats carry out rescues. RescueDaemon holds the shared state they
//! coordinate through and publishes every change as an event.
//!
//! # Core Concepts
//!
//! - **Actors**: each component is a tokio task owning its state; handles are cheap clones
//! - **Task chain**: completing a task derives its follow-ups in the same step
//! - **Events**: one broadcast bus carries every state change, in order per component
//! - **Simulator**: agent commands pass through a gateway to an external HTTP simulator
//!
//! # Modules
//!
//! - [`board`] - Task board with capability registry and follow-up derivation
//! - [`registry`] - Agent and victim positions, victim status
//! - [`rescue`] - Buoy inventory and rescues in progress
//! - [`goal`] - Mission goal tracking
//! - [`gateway`] - Simulator client and command gateway
//! - [`mission`] - All components on one bus
//! - [`events`] - Event types, bus and JSONL event log
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod board;
pub mod cli;
pub mod config;
pub mod demo;
pub mod domain;
pub mod error;
pub mod events;
pub mod gateway;
pub mod goal;
pub mod mission;
pub mod registry;
pub mod rescue;

// Re-export commonly used types
pub use board::{BoardStats, Completion, TaskBoard};
pub use config::{BoardConfig, Config, EventsConfig, MissionConfig, SimulationConfig};
pub use domain::{Position, Task, TaskStatus, TaskType, VictimStatus};
pub use error::{CoordError, CoordResponse};
pub use events::{EventBus, EventEmitter, MissionEvent};
pub use gateway::{CommandGateway, CommandStatus, GatewayError, HttpSimulationClient, SimulationBackend};
pub use goal::{GoalProgress, GoalTracker};
pub use mission::Mission;
pub use registry::{PositionRegistry, RegistrySnapshot};
pub use rescue::{RescueCoordinator, RescueSnapshot};
