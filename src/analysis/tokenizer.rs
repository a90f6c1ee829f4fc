//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step in the analysis pipeline. Substring search
//! relies on the input never being split on whitespace or punctuation, so the
//! only tokenizer shipped is [`whole::WholeTokenizer`].
//!
//! # Examples
//!
//! ```
//! use kopis::analysis::tokenizer::Tokenizer;
//! use kopis::analysis::tokenizer::whole::WholeTokenizer;
//!
//! let tokenizer = WholeTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 1);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so analyzers can be shared across the
/// indexing worker threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod whole;
