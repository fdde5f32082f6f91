//! Pagelens Core - Foundation crate for the Pagelens contact scanner.
//!
//! This crate provides the shared types, message contracts, error handling,
//! and configuration management that all other Pagelens crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`MatchKind`, `TextMatch`, `SessionId`, `Timestamp`)
//! - [`protocol`] - Tagged message enums for panel/scanner/coordinator traffic
//!
//! # Example
//!
//! ```rust
//! use pagelens_core::{AppConfig, MatchKind, TextMatch};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.patterns.min_phone_digits, 8);
//!
//! let m = TextMatch::new(MatchKind::Email, "a@b.com", 0, 7)?;
//! assert_eq!(m.value, "a@b.com");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod protocol;
pub mod types;

// Re-export commonly used types
pub use config::{AggregateConfig, AppConfig, PatternConfig, ScanConfig};
pub use error::{ConfigError, ConfigResult, PagelensError, Result};
pub use protocol::{CoordinatorRequest, CoordinatorResponse, ScannerCommand, ScannerEvent};
pub use types::{
    AggregateStats, HistoryEntry, KindCounts, MatchKind, ScanResultPayload, SessionId, TextMatch,
    Timestamp,
};
