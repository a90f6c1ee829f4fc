//! The dual-pipeline analyzer behind substring search.
//!
//! Index time and query time analyze text differently:
//!
//! ```text
//! Indexing: WholeTokenizer → LowercaseFilter → NgramFilter
//! Query:    WholeTokenizer → LowercaseFilter
//! ```
//!
//! A keyword matches a field exactly when its lowercased form is one of the
//! n-grams produced from the lowercased field value.

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::ngram::NgramFilter;
use crate::analysis::tokenizer::whole::WholeTokenizer;
use crate::error::Result;

/// Which pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisMode {
    /// Whole value, lowercased, expanded into n-grams.
    Indexing,
    /// Whole value, lowercased, not expanded.
    Query,
}

/// Analyzer holding the indexing and query pipelines for one gram window.
///
/// # Examples
///
/// ```
/// use kopis::analysis::analyzer::{AnalysisMode, SubstringAnalyzer};
///
/// let analyzer = SubstringAnalyzer::new(3, 4).unwrap();
///
/// let terms = analyzer.terms("AbCd", AnalysisMode::Indexing).unwrap();
/// assert_eq!(terms, vec!["abc", "abcd", "bcd"]);
///
/// let terms = analyzer.terms("AbCd", AnalysisMode::Query).unwrap();
/// assert_eq!(terms, vec!["abcd"]);
/// ```
#[derive(Clone, Debug)]
pub struct SubstringAnalyzer {
    indexing: PipelineAnalyzer,
    query: PipelineAnalyzer,
    ngram: NgramFilter,
}

impl SubstringAnalyzer {
    /// Create an analyzer for the `min_gram..=max_gram` window.
    pub fn new(min_gram: usize, max_gram: usize) -> Result<Self> {
        let ngram = NgramFilter::new(min_gram, max_gram)?;
        let tokenizer = Arc::new(WholeTokenizer::new());
        let lowercase = Arc::new(LowercaseFilter::new());

        let indexing = PipelineAnalyzer::new(tokenizer.clone())
            .add_filter(lowercase.clone())
            .add_filter(Arc::new(ngram.clone()))
            .with_name("substring_indexing");
        let query = PipelineAnalyzer::new(tokenizer)
            .add_filter(lowercase)
            .with_name("substring_query");

        Ok(Self {
            indexing,
            query,
            ngram,
        })
    }

    /// Run the pipeline selected by `mode`.
    pub fn analyze(&self, text: &str, mode: AnalysisMode) -> Result<TokenStream> {
        self.pipeline(mode).analyze(text)
    }

    /// Run the pipeline selected by `mode` and collect the term texts.
    pub fn terms(&self, text: &str, mode: AnalysisMode) -> Result<Vec<String>> {
        Ok(self.analyze(text, mode)?.map(|token| token.text).collect())
    }

    /// The single normalized query term, or `None` for empty input.
    pub fn query_term(&self, text: &str) -> Result<Option<String>> {
        Ok(self.analyze(text, AnalysisMode::Query)?.next().map(|t| t.text))
    }

    /// The pipeline used for `mode`.
    pub fn pipeline(&self, mode: AnalysisMode) -> &PipelineAnalyzer {
        match mode {
            AnalysisMode::Indexing => &self.indexing,
            AnalysisMode::Query => &self.query,
        }
    }

    pub fn min_gram(&self) -> usize {
        self.ngram.min_gram()
    }

    pub fn max_gram(&self) -> usize {
        self.ngram.max_gram()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KopisError;

    #[test]
    fn test_invalid_window_fails_fast() {
        assert!(matches!(
            SubstringAnalyzer::new(0, 40),
            Err(KopisError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SubstringAnalyzer::new(5, 4),
            Err(KopisError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_query_mode_emits_one_unexpanded_term() {
        let analyzer = SubstringAnalyzer::new(3, 40).unwrap();
        let terms = analyzer.terms("New Content HERE", AnalysisMode::Query).unwrap();

        assert_eq!(terms, vec!["new content here"]);
    }

    #[test]
    fn test_query_mode_does_not_clamp_long_input() {
        let analyzer = SubstringAnalyzer::new(3, 40).unwrap();
        let keyword = "y".repeat(60);

        assert_eq!(analyzer.query_term(&keyword).unwrap(), Some(keyword));
    }

    #[test]
    fn test_indexing_mode_expands_lowercased_value() {
        let analyzer = SubstringAnalyzer::new(3, 40).unwrap();
        let terms = analyzer.terms("Cesar", AnalysisMode::Indexing).unwrap();

        assert!(terms.contains(&"ces".to_string()));
        assert!(terms.contains(&"cesar".to_string()));
        assert!(terms.iter().all(|t| t.chars().all(|c| !c.is_uppercase())));
    }

    #[test]
    fn test_short_value_stays_searchable() {
        let analyzer = SubstringAnalyzer::new(3, 40).unwrap();

        assert_eq!(analyzer.terms("Al", AnalysisMode::Indexing).unwrap(), vec!["al"]);
        assert_eq!(analyzer.query_term("AL").unwrap(), Some("al".to_string()));
    }

    #[test]
    fn test_empty_input_yields_no_terms() {
        let analyzer = SubstringAnalyzer::new(3, 40).unwrap();

        assert!(analyzer.terms("", AnalysisMode::Indexing).unwrap().is_empty());
        assert!(analyzer.terms("", AnalysisMode::Query).unwrap().is_empty());
        assert_eq!(analyzer.query_term("").unwrap(), None);
    }

    #[test]
    fn test_pipeline_names() {
        let analyzer = SubstringAnalyzer::new(3, 40).unwrap();

        assert_eq!(analyzer.pipeline(AnalysisMode::Indexing).name(), "substring_indexing");
        assert_eq!(analyzer.pipeline(AnalysisMode::Query).name(), "substring_query");
        assert_eq!(analyzer.min_gram(), 3);
        assert_eq!(analyzer.max_gram(), 40);
    }
}
