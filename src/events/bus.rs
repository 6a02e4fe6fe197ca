//! Event Bus - central pub/sub system for mission events
//!
//! The EventBus uses a tokio broadcast channel to deliver events to all
//! subscribers. Components hold an [`EventEmitter`]; consumers subscribe.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use super::types::MissionEvent;

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Central event bus for mission state changes
pub struct EventBus {
    tx: broadcast::Sender<MissionEvent>,
}

impl EventBus {
    /// Create a new event bus with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "EventBus::new: creating event bus");
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Create a new event bus with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no subscribers the event is dropped. Slow subscribers
    /// lose the oldest events once the channel is full.
    pub fn emit(&self, event: MissionEvent) {
        debug!(event_type = event.event_type(), source = event.source(), "EventBus::emit");
        let _ = self.tx.send(event);
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<MissionEvent> {
        debug!("EventBus::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Create an emitter handle for a component
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter { tx: self.tx.clone() }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Handle for components to emit events without owning the bus
#[derive(Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<MissionEvent>,
}

impl EventEmitter {
    /// Emit an event; never fails
    pub fn emit(&self, event: MissionEvent) {
        debug!(event_type = event.event_type(), "EventEmitter::emit");
        let _ = self.tx.send(event);
    }

    /// An emitter whose events go nowhere (for components used standalone)
    pub fn detached() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }
}

/// Create an event bus wrapped in an Arc for shared ownership
pub fn create_event_bus(capacity: usize) -> Arc<EventBus> {
    Arc::new(EventBus::new(capacity))
}
