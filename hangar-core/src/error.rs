//! Error types for Hangar core.

use std::{error::Error, fmt};

/// Error type for ship operations.
///
/// `BadRequest` and `NotFound` are the two outcomes a caller is expected to
/// surface to clients; `Storage` wraps failures of the backing repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HangarError {
    /// Malformed id, invalid or missing field, or unparseable query parameter.
    BadRequest(String),
    /// The referenced ship does not exist.
    NotFound(String),
    /// The repository failed to complete the operation.
    Storage(String),
}

impl HangarError {
    /// Build a client error from a message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Build a not-found error for a ship id.
    pub fn ship_not_found(id: i64) -> Self {
        Self::NotFound(format!("ship {id} not found"))
    }

    /// Build a storage error from any displayable failure.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

impl fmt::Display for HangarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for HangarError {}

/// Convenience result type for Hangar core.
pub type Result<T> = std::result::Result<T, HangarError>;
