//! Analyzer implementations that combine tokenizers and filters.

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod per_field;
pub mod pipeline;
pub mod substring;

pub use analyzer::Analyzer;
pub use per_field::PerFieldAnalyzer;
pub use pipeline::PipelineAnalyzer;
pub use substring::{AnalysisMode, SubstringAnalyzer};
