//! Document error types.

use thiserror::Error;

/// Errors from page document operations.
#[derive(Debug, Error)]
pub enum DomError {
    /// The node handle no longer refers to a node in this document.
    #[error("stale node handle")]
    StaleNode,

    /// The operation requires a text node.
    #[error("node is not a text node")]
    NotAText,

    /// The operation requires an element node.
    #[error("node is not an element")]
    NotAnElement,

    /// Replacement parts do not reproduce the original text.
    #[error("replacement text mismatch: expected {expected} bytes, got {actual}")]
    TextMismatch {
        /// Length of the original text node content
        expected: usize,
        /// Combined length of the replacement parts
        actual: usize,
    },
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DomError>;
