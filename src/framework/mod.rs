//! Generic storage engine shared by every record kind.
//!
//! # Main Components
//!
//! - [`Record`] - Trait that stored kinds implement
//! - [`KeyedStore`] - Concurrency-safe map with monotonic identity assignment
//! - [`Repository`] - Async seam over a store, implemented by `KeyedStore` and the mock
//! - [`StoreError`] - The single failure a store reports
//! - [`EventSink`] - Injected receiver for domain events
//!
//! # Testing
//!
//! See [`mock`] for a scriptable repository with artificial latency.

pub mod error;
pub mod events;
pub mod mock;
pub mod record;
pub mod repository;
pub mod store;

pub use error::StoreError;
pub use events::{noop_sink, Event, EventSink, NoopSink, RecordingSink, SharedSink, TracingSink};
pub use record::{Record, RecordId};
pub use repository::{Repository, SharedRepository};
pub use store::KeyedStore;
