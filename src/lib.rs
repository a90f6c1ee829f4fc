//! # Kopis
//!
//! Case-insensitive substring search over n-gram inverted indexes.
//!
//! Every indexed field value is kept whole, lowercased, and expanded into all
//! of its substrings within a length window (3 to 40 characters by default).
//! A query is lowercased but not expanded, so it hits a document exactly when
//! it is a contiguous substring of one of the searched fields.
//!
//! ## Features
//!
//! - Substring matching with no word-boundary tokenization
//! - Separate indexing and query analysis pipelines
//! - Per-field gram windows
//! - Full rebuilds published with an atomic swap, optionally in parallel
//! - OR semantics across the searched fields
//!
//! ```
//! use kopis::prelude::*;
//!
//! let engine = SearchEngine::new(EngineConfig::with_fields(["title", "author"])).unwrap();
//! engine
//!     .rebuild_index(&[
//!         Document::builder("1").add_text("author", "Cesar").build(),
//!         Document::builder("2").add_text("author", "Cesar").build(),
//!         Document::builder("3").add_text("author", "Ana").build(),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(engine.search("CES", &["author"]).unwrap().len(), 2);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexer;
pub mod search;

pub mod prelude {
    pub use crate::config::{EngineConfig, FieldConfig, IndexerConfig, UnknownFieldPolicy};
    pub use crate::document::document::{DocId, Document};
    pub use crate::document::field_value::FieldValue;
    pub use crate::engine::SearchEngine;
    pub use crate::error::{KopisError, Result};
    pub use crate::search::request::{SearchRequest, SearchResults};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
