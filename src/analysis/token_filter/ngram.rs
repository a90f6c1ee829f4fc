//! N-gram expansion filter.
//!
//! Expands each token into every contiguous substring whose length (in
//! characters) lies in `min_gram..=max_gram`. Indexing a field through this
//! filter and querying it with the unexpanded, lowercased keyword is what
//! turns exact term lookup into substring matching.
//!
//! # Examples
//!
//! ```
//! use kopis::analysis::token_filter::ngram::expand;
//!
//! assert_eq!(expand("abcd", 3, 4), vec!["abc", "abcd", "bcd"]);
//!
//! // Tokens shorter than the window are kept whole.
//! assert_eq!(expand("ab", 3, 40), vec!["ab"]);
//! ```

use ahash::AHashSet;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{KopisError, Result};

/// Default minimum n-gram length.
pub const DEFAULT_MIN_GRAM: usize = 3;

/// Default maximum n-gram length (inclusive).
pub const DEFAULT_MAX_GRAM: usize = 40;

/// A filter that replaces every token with its distinct n-grams.
///
/// `max_gram` is inclusive, so a field value can be matched by a query of up
/// to exactly `max_gram` characters and never by a longer one. A token shorter
/// than `min_gram` is emitted unexpanded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NgramFilter {
    /// Minimum n-gram size
    min_gram: usize,
    /// Maximum n-gram size
    max_gram: usize,
}

impl NgramFilter {
    /// Create a new n-gram filter.
    ///
    /// # Errors
    ///
    /// Returns [`KopisError::InvalidConfiguration`] if `min_gram` is 0 or
    /// `max_gram` is less than `min_gram`.
    pub fn new(min_gram: usize, max_gram: usize) -> Result<Self> {
        validate_window(min_gram, max_gram)?;
        Ok(Self { min_gram, max_gram })
    }

    /// Minimum n-gram size.
    pub fn min_gram(&self) -> usize {
        self.min_gram
    }

    /// Maximum n-gram size.
    pub fn max_gram(&self) -> usize {
        self.max_gram
    }
}

impl Default for NgramFilter {
    fn default() -> Self {
        Self {
            min_gram: DEFAULT_MIN_GRAM,
            max_gram: DEFAULT_MAX_GRAM,
        }
    }
}

/// Check an n-gram window.
pub fn validate_window(min_gram: usize, max_gram: usize) -> Result<()> {
    if min_gram == 0 {
        return Err(KopisError::invalid_config("min_gram_size must be at least 1"));
    }
    if max_gram < min_gram {
        return Err(KopisError::invalid_config(format!(
            "max_gram_size ({max_gram}) must be >= min_gram_size ({min_gram})"
        )));
    }
    Ok(())
}

/// Byte ranges of the distinct n-grams of `token`, in generation order.
fn gram_ranges(token: &str, min_gram: usize, max_gram: usize) -> Vec<(usize, usize)> {
    // Byte offset of every char boundary, including the end of the string.
    let boundaries: Vec<usize> = token
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(token.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    if char_len == 0 {
        return Vec::new();
    }
    if char_len < min_gram {
        return vec![(0, token.len())];
    }

    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut ranges = Vec::new();
    for start in 0..char_len {
        let longest = max_gram.min(char_len - start);
        for gram_size in min_gram..=longest {
            let range = (boundaries[start], boundaries[start + gram_size]);
            if seen.insert(&token[range.0..range.1]) {
                ranges.push(range);
            }
        }
    }
    ranges
}

/// Expand `token` into its distinct n-grams.
///
/// For every start offset `i` and every length `L` in
/// `min_gram..=min(max_gram, len - i)` the substring `token[i..i + L]` is
/// produced once. Lengths are counted in characters.
pub fn expand(token: &str, min_gram: usize, max_gram: usize) -> Vec<String> {
    gram_ranges(token, min_gram, max_gram)
        .into_iter()
        .map(|(start, end)| token[start..end].to_string())
        .collect()
}

impl Filter for NgramFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let mut grams = Vec::new();
        let mut position = 0;

        // Grams are distinct within a token; the whole-value tokenizer never
        // yields more than one.
        for token in tokens {
            for (start, end) in gram_ranges(&token.text, self.min_gram, self.max_gram) {
                let text = &token.text[start..end];
                grams.push(Token::with_offsets(
                    text,
                    position,
                    token.start_offset + start,
                    token.start_offset + end,
                ));
                position += 1;
            }
        }

        Ok(Box::new(grams.into_iter()))
    }

    fn name(&self) -> &'static str {
        "ngram"
    }
}
