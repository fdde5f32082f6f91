//! Pagelens DOM - Owned, mutable page documents.
//!
//! This crate parses HTML (via `scraper`) into a tree the scanner is allowed
//! to rewrite: text nodes can be spliced into literal/marker sequences and
//! element attributes can be edited in place, while node handles taken before
//! a mutation stay valid as a materialized snapshot.
//!
//! # Example
//!
//! ```rust
//! use pagelens_dom::PageDocument;
//!
//! let doc = PageDocument::parse("<p>write to a@b.com</p>", "https://example.com/");
//! let nodes = doc.text_nodes();
//! assert_eq!(doc.node_text(nodes[0]).unwrap(), "write to a@b.com");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod document;
pub mod error;
pub mod node;

// Re-export commonly used types
pub use document::PageDocument;
pub use error::{DomError, Result};
pub use node::{ElementData, PageNode, TextPart, NON_CONTENT_TAGS};

/// Stable handle to a node within one document's lifetime.
pub use ego_tree::NodeId;
