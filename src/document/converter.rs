//! Document converters for loading records from files.

use std::path::Path;

use crate::document::document::Document;
use crate::error::Result;

pub mod jsonl;

/// A trait for converting file formats into document iterators.
///
/// # Example
///
/// ```no_run
/// use kopis::document::converter::DocumentConverter;
/// use kopis::document::converter::jsonl::JsonlDocumentConverter;
///
/// let converter = JsonlDocumentConverter::new();
/// for doc in converter.convert("documents.jsonl").unwrap() {
///     let doc = doc.unwrap();
///     println!("{}", doc.id());
/// }
/// ```
pub trait DocumentConverter {
    /// The iterator type that yields documents.
    type Iter: Iterator<Item = Result<Document>>;

    /// Convert a file into an iterator of Documents.
    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter>;
}
