//! Pagelens Scanner - The per-page contact scanning engine.
//!
//! A [`PageScanner`] walks a snapshot of a document's text nodes, classifies
//! each span against the email, phone, and social pattern families, resolves
//! overlapping candidates first-match-wins, deduplicates values per session,
//! and rewrites matched spans into highlight markers without losing a single
//! character of page text. A final pass classifies hyperlink destinations
//! that never appear as visible text.
//!
//! # Modules
//!
//! - [`classifier`] - Pattern families and candidate extraction
//! - [`resolver`] - Overlap resolution between candidates
//! - [`session`] - Per-scan deduplication and highlight bookkeeping
//! - [`annotator`] - Text node rewriting into literal/marker sequences
//! - [`scanner`] - The cancellable scan loop and command dispatch

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod annotator;
pub mod classifier;
pub mod error;
pub mod resolver;
pub mod scanner;
pub mod session;

// Re-export commonly used types
pub use annotator::{AcceptedMatch, HIGHLIGHT_CLASS, HIGHLIGHT_STYLE, NEUTRAL_STYLE, PULSE_STYLE};
pub use classifier::PatternClassifier;
pub use error::{Result, ScanError};
pub use resolver::resolve;
pub use scanner::PageScanner;
pub use session::ScanSession;
