//! Whole-database snapshot persistence.
//!
//! The four stores are saved to and restored from a single JSON artifact. See
//! [`snapshot`] for the document layout.

pub mod error;
pub mod snapshot;

pub use error::SnapshotError;
pub use snapshot::{load, save, NextIds, SnapshotDocument, StoreSet};
