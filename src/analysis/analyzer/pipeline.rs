//! Pipeline analyzer that combines a tokenizer and filters.
//!
//! The pipeline applies the tokenizer first, then each filter in the order it
//! was added.
//!
//! # Examples
//!
//! ```
//! use kopis::analysis::analyzer::{Analyzer, PipelineAnalyzer};
//! use kopis::analysis::tokenizer::whole::WholeTokenizer;
//! use kopis::analysis::token_filter::lowercase::LowercaseFilter;
//! use std::sync::Arc;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(WholeTokenizer::new()))
//!     .add_filter(Arc::new(LowercaseFilter::new()))
//!     .with_name("query");
//!
//! let tokens: Vec<_> = analyzer.analyze("Hello World").unwrap().collect();
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].text, "hello world");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;
    use crate::analysis::token_filter::lowercase::LowercaseFilter;
    use crate::analysis::token_filter::ngram::NgramFilter;
    use crate::analysis::tokenizer::whole::WholeTokenizer;

    #[test]
    fn test_filters_run_in_order() {
        let analyzer = PipelineAnalyzer::new(Arc::new(WholeTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(NgramFilter::new(3, 3).unwrap()));

        let tokens: Vec<Token> = analyzer.analyze("ABCd").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "abc");
        assert_eq!(tokens[1].text, "bcd");
    }

    #[test]
    fn test_default_and_custom_name() {
        let analyzer = PipelineAnalyzer::new(Arc::new(WholeTokenizer::new()));
        assert_eq!(analyzer.name(), "pipeline_whole");

        let analyzer = analyzer.with_name("indexing");
        assert_eq!(analyzer.name(), "indexing");
    }

    #[test]
    fn test_debug_lists_stages() {
        let analyzer = PipelineAnalyzer::new(Arc::new(WholeTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()));
        let debug = format!("{analyzer:?}");

        assert!(debug.contains("whole"));
        assert!(debug.contains("lowercase"));
    }
}
