//! Token filter implementations for token transformation.
//!
//! Filters receive the token stream produced by a tokenizer and return a new
//! one. Kopis uses two of them:
//!
//! - [`lowercase::LowercaseFilter`] - Case-folds tokens
//! - [`ngram::NgramFilter`] - Expands a token into its bounded substrings
//!
//! ```text
//! WholeTokenizer → Lowercase → NGram → Index
//! WholeTokenizer → Lowercase         → Query term
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod ngram;
