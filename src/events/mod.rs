//! Event bus for mission state changes
//!
//! Every mutating operation on the task board, registry, rescue coordinator
//! and goal tracker emits a [`MissionEvent`] after its state change has been
//! applied. Consumers (CLI output, the JSONL event log, agents) subscribe to
//! the bus.
//!
//! ```text
//!   TaskBoard    PositionRegistry   RescueCoordinator   GoalTracker   CommandGateway
//!       │               │                   │                │               │
//!       └───────────────┴─────────┬─────────┴────────────────┴───────────────┘
//!                                 ▼
//!                  EventBus (tokio::sync::broadcast)
//!                                 │
//!                ┌────────────────┼────────────────┐
//!                ▼                ▼                ▼
//!           CLI printer     EventLogger       agent tasks
//!                           (.jsonl file)
//! ```
//!
//! Emission is fire-and-forget: having no subscriber never fails the
//! operation that produced the event. Events from one component arrive in
//! the order that component applied its operations; there is no ordering
//! across components.

mod bus;
mod logger;
mod types;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventEmitter, create_event_bus};
pub use logger::{EventLogger, read_event_log, spawn_event_logger};
pub use types::{EventLogEntry, MissionEvent};
