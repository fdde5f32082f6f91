//! Pagelens Coordinator - Cross-session result aggregation.
//!
//! The coordinator receives completed scan results, folds them into a
//! persistent aggregate with global per-kind deduplication, and keeps a
//! capped history of the scans that contributed new values. Storage is a
//! single JSON record in `SQLite`, so the aggregate survives restarts and
//! deserializes leniently as fields are added.
//!
//! # Example
//!
//! ```no_run
//! use pagelens_coordinator::{AggregateStore, Coordinator};
//! use pagelens_core::{AggregateConfig, CoordinatorRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = AggregateStore::connect("pagelens.db").await?;
//! let coordinator = Coordinator::new(store, AggregateConfig::default());
//! let stats = coordinator.handle(CoordinatorRequest::GetStats).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregate;
pub mod coordinator;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use aggregate::Aggregate;
pub use coordinator::Coordinator;
pub use error::{CoordinatorError, Result};
pub use store::AggregateStore;
