//! Error types for the order pipeline.

use crate::error::ErrorKind;
use crate::framework::{RecordId, StoreError};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The proposal is structurally invalid.
    #[error("Invalid order: {0}")]
    InvalidRequest(String),

    /// The customer referenced by the proposal does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(RecordId),

    /// A book referenced by one of the line items does not exist.
    #[error("Book not found: {0}")]
    BookNotFound(RecordId),

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(RecordId),

    /// The caller's deadline elapsed before the store call resolved.
    #[error("Order operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store failed or the dispatched task did not complete.
    #[error("Order store failure: {0}")]
    Internal(String),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            OrderError::CustomerNotFound(_) | OrderError::BookNotFound(_) => ErrorKind::ReferenceNotFound,
            OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::Timeout(_) => ErrorKind::Timeout,
            OrderError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Maps a failure from the order store itself.
    pub(crate) fn from_order_store(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { id, .. } => OrderError::NotFound(id),
            StoreError::Internal(msg) => OrderError::Internal(msg),
        }
    }
}
