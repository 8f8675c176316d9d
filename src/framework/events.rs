//! # Event Sink
//!
//! Domain events (records created/updated/deleted, orders placed, snapshots
//! saved/loaded) go through an [`EventSink`] handed to each component at
//! construction. Nothing reaches for a process-wide logger to report them.
//!
//! - [`NoopSink`] is the default and drops everything.
//! - [`TracingSink`] forwards events to `tracing` at info level.
//! - [`RecordingSink`] keeps events in memory so tests can assert on them.

use crate::framework::RecordId;
use std::sync::{Arc, Mutex};
use tracing::info;

/// A significant, externally observable state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created { kind: &'static str, id: RecordId },
    Updated { kind: &'static str, id: RecordId },
    Deleted { kind: &'static str, id: RecordId },
    OrderPlaced {
        order_id: RecordId,
        customer_id: RecordId,
        total_price: f64,
        item_count: usize,
    },
    SnapshotSaved { path: String },
    SnapshotLoaded { path: String },
}

/// Receiver for domain events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn EventSink>;

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: Event) {}
}

/// Sink that logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        match event {
            Event::Created { kind, id } => info!(entity_type = kind, id, "Created"),
            Event::Updated { kind, id } => info!(entity_type = kind, id, "Updated"),
            Event::Deleted { kind, id } => info!(entity_type = kind, id, "Deleted"),
            Event::OrderPlaced {
                order_id,
                customer_id,
                total_price,
                item_count,
            } => info!(order_id, customer_id, total_price, item_count, "Order placed"),
            Event::SnapshotSaved { path } => info!(%path, "Snapshot saved"),
            Event::SnapshotLoaded { path } => info!(%path, "Snapshot loaded"),
        }
    }
}

/// Sink that stores events in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event emitted so far, oldest first.
    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Default sink used when a component is built without one.
pub fn noop_sink() -> SharedSink {
    Arc::new(NoopSink)
}
