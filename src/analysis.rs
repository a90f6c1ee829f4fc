//! Text analysis module for Kopis.
//!
//! Field text becomes index terms through an analyzer: a tokenizer followed by
//! a chain of token filters. Kopis keeps two pipelines side by side, one for
//! indexing (whole value, lowercase, n-gram expansion) and one for queries
//! (whole value, lowercase). See [`analyzer::SubstringAnalyzer`].

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
