//! # Error Kinds
//!
//! Every layer has its own `thiserror` enum (`StoreError`, `CatalogError`, `OrderError`,
//! `SnapshotError`). They all collapse into one [`ErrorKind`] so a request layer can
//! pick a response code without matching on each type.

use std::fmt;

/// Cross-cutting failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Record absent by identity.
    NotFound,
    /// A customer or book referenced from an order is absent.
    ReferenceNotFound,
    /// Structurally invalid input (empty item list, missing required text).
    InvalidRequest,
    /// Request method not supported by the route. Produced by the request layer only.
    MethodNotAllowed,
    /// Caller deadline elapsed before the store call resolved.
    Timeout,
    /// Unexpected fault.
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent response code for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound | ErrorKind::ReferenceNotFound => 404,
            ErrorKind::InvalidRequest => 400,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::Timeout => 408,
            ErrorKind::Internal => 500,
        }
    }

    /// True for kinds the caller caused (4xx-equivalent), excluding timeouts.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound
                | ErrorKind::ReferenceNotFound
                | ErrorKind::InvalidRequest
                | ErrorKind::MethodNotAllowed
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::ReferenceNotFound => "reference_not_found",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::MethodNotAllowed => "method_not_allowed",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}
