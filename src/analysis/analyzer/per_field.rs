//! Per-field analyzer table.

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::substring::{AnalysisMode, SubstringAnalyzer};
use crate::analysis::token::TokenStream;
use crate::config::EngineConfig;
use crate::error::Result;

/// Maps field names to the [`SubstringAnalyzer`] that indexes them.
///
/// Fields without an entry use the default analyzer. Fields that share a gram
/// window share one analyzer instance.
///
/// # Example
///
/// ```
/// use kopis::analysis::analyzer::{AnalysisMode, PerFieldAnalyzer, SubstringAnalyzer};
/// use std::sync::Arc;
///
/// let mut analyzer = PerFieldAnalyzer::new(Arc::new(SubstringAnalyzer::new(3, 40).unwrap()));
/// analyzer.add_analyzer("code", Arc::new(SubstringAnalyzer::new(2, 8).unwrap()));
///
/// let tokens: Vec<_> = analyzer
///     .analyze_field("code", "AB", AnalysisMode::Indexing)
///     .unwrap()
///     .collect();
/// assert_eq!(tokens[0].text, "ab");
/// ```
#[derive(Clone, Debug)]
pub struct PerFieldAnalyzer {
    /// Default analyzer for fields not in the map.
    default_analyzer: Arc<SubstringAnalyzer>,

    /// Map of field names to their specific analyzers.
    field_analyzers: AHashMap<String, Arc<SubstringAnalyzer>>,
}

impl PerFieldAnalyzer {
    /// Create a new per-field analyzer with a default analyzer.
    pub fn new(default_analyzer: Arc<SubstringAnalyzer>) -> Self {
        Self {
            default_analyzer,
            field_analyzers: AHashMap::new(),
        }
    }

    /// Build the table described by an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let default_analyzer = Arc::new(SubstringAnalyzer::new(
            config.min_gram_size,
            config.max_gram_size,
        )?);
        let mut by_window: AHashMap<(usize, usize), Arc<SubstringAnalyzer>> = AHashMap::new();
        by_window.insert(
            (config.min_gram_size, config.max_gram_size),
            Arc::clone(&default_analyzer),
        );

        let mut analyzer = Self::new(default_analyzer);
        for field in &config.fields {
            let (min, max) = config.gram_window(field);
            let shared = match by_window.get(&(min, max)) {
                Some(existing) => Arc::clone(existing),
                None => {
                    let created = Arc::new(SubstringAnalyzer::new(min, max)?);
                    by_window.insert((min, max), Arc::clone(&created));
                    created
                }
            };
            analyzer.add_analyzer(field.name.clone(), shared);
        }

        Ok(analyzer)
    }

    /// Add a field-specific analyzer.
    pub fn add_analyzer(&mut self, field: impl Into<String>, analyzer: Arc<SubstringAnalyzer>) {
        self.field_analyzers.insert(field.into(), analyzer);
    }

    /// Get the analyzer for a specific field.
    pub fn get_analyzer(&self, field: &str) -> &Arc<SubstringAnalyzer> {
        self.field_analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
    }

    /// Get the default analyzer.
    pub fn default_analyzer(&self) -> &Arc<SubstringAnalyzer> {
        &self.default_analyzer
    }

    /// Analyze text with the analyzer for the given field.
    pub fn analyze_field(&self, field: &str, text: &str, mode: AnalysisMode) -> Result<TokenStream> {
        self.get_analyzer(field).analyze(text, mode)
    }

    /// Normalize a keyword with the query pipeline.
    ///
    /// The query pipeline does not depend on the gram window, so one term
    /// serves every field.
    pub fn query_term(&self, keyword: &str) -> Result<Option<String>> {
        self.default_analyzer.query_term(keyword)
    }
}
