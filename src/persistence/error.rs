//! Error types for snapshot persistence.

use crate::error::ErrorKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The artifact could not be read, written or renamed into place.
    #[error("Snapshot I/O failed for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The artifact is not a valid snapshot document.
    #[error("Snapshot format error: {0}")]
    Format(#[from] serde_json::Error),

    /// A collection key is not a record identity.
    #[error("Invalid {collection} key {key:?} in snapshot")]
    InvalidKey { collection: &'static str, key: String },
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SnapshotError::Io {
            path: path.into(),
            source,
        }
    }

    /// Every snapshot failure is server-side.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}
