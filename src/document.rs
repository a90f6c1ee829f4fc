//! Records handed to the indexer.
//!
//! A [`document::Document`] is an opaque [`document::DocId`] plus a map from
//! field name to [`field_value::FieldValue`]. Only text values are indexed;
//! the engine never stores documents, so hydrating ids back into records is
//! up to the caller.
//!
//! # Examples
//!
//! ```
//! use kopis::document::document::Document;
//!
//! let doc = Document::builder("post-1")
//!     .add_text("title", "Happy Days")
//!     .add_text("author", "Cesar")
//!     .add_null("content")
//!     .build();
//!
//! assert_eq!(doc.id().as_str(), "post-1");
//! assert_eq!(doc.text("title"), Some("Happy Days"));
//! assert_eq!(doc.text("content"), None);
//! ```

pub mod converter;
pub mod document;
pub mod field_value;
