//! Scanner error types.

use thiserror::Error;

/// Errors from the scanning engine.
///
/// Nothing here is fatal to the hosting process: node-level failures are
/// logged and skipped, and a scan always eventually returns to idle.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A pattern family failed to compile (bad allow-list entry).
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A document operation failed.
    #[error("document error: {0}")]
    Dom(#[from] pagelens_dom::DomError),
}

/// Result type alias for scanning operations.
pub type Result<T> = std::result::Result<T, ScanError>;
