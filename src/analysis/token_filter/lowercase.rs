//! Lowercase filter implementation.
//!
//! This module provides a filter that converts all token text to lowercase,
//! which is what makes matching case-insensitive.
//!
//! # Examples
//!
//! ```
//! use kopis::analysis::token_filter::Filter;
//! use kopis::analysis::token_filter::lowercase::LowercaseFilter;
//! use kopis::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Hello", 0), Token::new("WORLD", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "hello");
//! assert_eq!(filtered[1].text, "world");
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that converts tokens to lowercase.
///
/// Case folding is locale-independent: ASCII text takes the
/// `to_ascii_lowercase` fast path and everything else goes through the
/// Unicode default mapping of [`str::to_lowercase`]. Positions and offsets are
/// preserved.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

/// Case-fold a string the same way the filter does.
pub fn fold_case(text: &str) -> String {
    if text.is_ascii() {
        text.to_ascii_lowercase()
    } else {
        text.to_lowercase()
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| {
            let folded = fold_case(&token.text);
            token.with_text(folded)
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
