//! Error types for the catalog clients.

use crate::error::ErrorKind;
use crate::framework::StoreError;
use thiserror::Error;

/// Errors that can occur during book, author or customer operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// Required text fields are missing.
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            CatalogError::Store(e) => e.kind(),
        }
    }
}
