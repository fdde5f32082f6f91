//! Coordinator error types.

use thiserror::Error;

/// Errors from aggregate storage and request handling.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Underlying `SQLx` error.
    #[error("store error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for coordinator operations.
pub type Result<T> = std::result::Result<T, CoordinatorError>;
