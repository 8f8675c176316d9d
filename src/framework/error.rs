//! # Store Errors
//!
//! The only failure a store reports is a missing identity. Everything else would be
//! a programming error.

use crate::error::ErrorKind;
use crate::framework::RecordId;

/// Errors produced by a [`KeyedStore`](crate::framework::KeyedStore).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: &'static str, id: RecordId },
    /// Backend fault. `KeyedStore` never produces this; other
    /// [`Repository`](crate::framework::Repository) implementations may.
    #[error("store failure: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
