//! Error types for the Kopis library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`KopisError`] enum.
//!
//! # Examples
//!
//! ```
//! use kopis::error::{KopisError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(KopisError::invalid_config("min_gram_size must be at least 1"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Kopis operations.
#[derive(Error, Debug)]
pub enum KopisError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The engine or one of its pipelines was configured inconsistently.
    ///
    /// Raised at construction time only, never while indexing or querying.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A rebuild could not complete. The previously served index stays active.
    #[error("Rebuild failure: {0}")]
    RebuildFailure(String),

    /// A search named a field that the served index does not contain.
    #[error("Field not indexed: {0}")]
    FieldNotIndexed(String),

    /// Operation cancelled
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with KopisError.
pub type Result<T> = std::result::Result<T, KopisError>;

impl KopisError {
    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        KopisError::InvalidConfiguration(msg.into())
    }

    /// Create a new rebuild failure.
    pub fn rebuild<S: Into<String>>(msg: S) -> Self {
        KopisError::RebuildFailure(msg.into())
    }

    /// Create a new field-not-indexed error.
    pub fn field_not_indexed<S: Into<String>>(field: S) -> Self {
        KopisError::FieldNotIndexed(field.into())
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        KopisError::OperationCancelled(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        KopisError::Other(format!("Parse error: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        KopisError::Other(msg.into())
    }
}
