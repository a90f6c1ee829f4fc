//! Configuration for the search engine.
//!
//! [`EngineConfig`] is plain data: it derives `serde` traits so it can be
//! loaded from JSON, and [`EngineConfig::validate`] rejects inconsistent
//! settings before any pipeline is built.
//!
//! ```
//! use kopis::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(
//!     r#"{ "max_gram_size": 20, "fields": ["title", { "name": "content", "max_gram_size": 30 }] }"#,
//! ).unwrap();
//!
//! assert_eq!(config.min_gram_size, 3);
//! assert_eq!(config.max_gram_size, 20);
//! assert_eq!(config.field_names(), vec!["title", "content"]);
//! ```

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::analysis::token_filter::ngram::{DEFAULT_MAX_GRAM, DEFAULT_MIN_GRAM, validate_window};
use crate::error::{KopisError, Result};

/// What a search does with a field the served index does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Contribute nothing to the union.
    #[default]
    Ignore,
    /// Fail the search with [`KopisError::FieldNotIndexed`].
    Reject,
}

/// Configuration of one indexed field.
///
/// In JSON a field is either its bare name or an object that may override the
/// engine-wide gram window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSpec")]
pub struct FieldConfig {
    /// Field name.
    pub name: String,
    /// Minimum n-gram size for this field, if different from the engine's.
    pub min_gram_size: Option<usize>,
    /// Maximum n-gram size for this field, if different from the engine's.
    pub max_gram_size: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSpec {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        min_gram_size: Option<usize>,
        #[serde(default)]
        max_gram_size: Option<usize>,
    },
}

impl From<FieldSpec> for FieldConfig {
    fn from(spec: FieldSpec) -> Self {
        match spec {
            FieldSpec::Name(name) => FieldConfig::new(name),
            FieldSpec::Full {
                name,
                min_gram_size,
                max_gram_size,
            } => FieldConfig {
                name,
                min_gram_size,
                max_gram_size,
            },
        }
    }
}

impl FieldConfig {
    /// A field using the engine-wide gram window.
    pub fn new<S: Into<String>>(name: S) -> Self {
        FieldConfig {
            name: name.into(),
            min_gram_size: None,
            max_gram_size: None,
        }
    }

    /// Override the gram window for this field.
    pub fn with_gram_window(mut self, min_gram_size: usize, max_gram_size: usize) -> Self {
        self.min_gram_size = Some(min_gram_size);
        self.max_gram_size = Some(max_gram_size);
        self
    }
}

/// Configuration for index rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Analyze documents on a thread pool.
    pub parallel: bool,
    /// Worker threads for parallel rebuilds. Defaults to the number of CPUs.
    pub num_threads: Option<usize>,
    /// Upper bound on the number of postings a rebuild may produce.
    pub max_postings: Option<usize>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        IndexerConfig {
            parallel: true,
            num_threads: None,
            max_postings: None,
        }
    }
}

impl IndexerConfig {
    /// Number of worker threads a parallel rebuild uses.
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get)
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum n-gram size.
    pub min_gram_size: usize,
    /// Maximum n-gram size (inclusive).
    pub max_gram_size: usize,
    /// Fields indexed by [`crate::engine::SearchEngine::rebuild_index`].
    pub fields: Vec<FieldConfig>,
    /// Handling of search fields absent from the index.
    pub unknown_field_policy: UnknownFieldPolicy,
    /// Rebuild settings.
    pub indexer: IndexerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_gram_size: DEFAULT_MIN_GRAM,
            max_gram_size: DEFAULT_MAX_GRAM,
            fields: Vec::new(),
            unknown_field_policy: UnknownFieldPolicy::default(),
            indexer: IndexerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration indexing the given fields.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EngineConfig {
            fields: fields.into_iter().map(FieldConfig::new).collect(),
            ..Default::default()
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the engine-wide gram window.
    pub fn with_gram_window(mut self, min_gram_size: usize, max_gram_size: usize) -> Self {
        self.min_gram_size = min_gram_size;
        self.max_gram_size = max_gram_size;
        self
    }

    /// Set the unknown field policy.
    pub fn with_unknown_field_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_field_policy = policy;
        self
    }

    /// Set the indexer configuration.
    pub fn with_indexer(mut self, indexer: IndexerConfig) -> Self {
        self.indexer = indexer;
        self
    }

    /// Names of the configured fields, in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Effective gram window of a field.
    pub fn gram_window(&self, field: &FieldConfig) -> (usize, usize) {
        (
            field.min_gram_size.unwrap_or(self.min_gram_size),
            field.max_gram_size.unwrap_or(self.max_gram_size),
        )
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        validate_window(self.min_gram_size, self.max_gram_size)?;

        let mut seen = AHashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(KopisError::invalid_config("field name must not be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(KopisError::invalid_config(format!(
                    "field '{}' is configured more than once",
                    field.name
                )));
            }
            let (min, max) = self.gram_window(field);
            validate_window(min, max).map_err(|e| {
                KopisError::invalid_config(format!("field '{}': {e}", field.name))
            })?;
        }

        if self.indexer.num_threads == Some(0) {
            return Err(KopisError::invalid_config("num_threads must be at least 1"));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.min_gram_size, 3);
        assert_eq!(config.max_gram_size, 40);
        assert!(config.fields.is_empty());
        assert_eq!(config.unknown_field_policy, UnknownFieldPolicy::Ignore);
        assert!(config.indexer.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_windows() {
        let config = EngineConfig::default().with_gram_window(0, 40);
        assert!(matches!(
            config.validate(),
            Err(KopisError::InvalidConfiguration(_))
        ));

        let config = EngineConfig::default().with_gram_window(10, 5);
        assert!(matches!(
            config.validate(),
            Err(KopisError::InvalidConfiguration(_))
        ));

        let config = EngineConfig::default().with_gram_window(3, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_field_window_override_is_validated() {
        let config = EngineConfig::with_fields(["title"])
            .with_field(FieldConfig::new("content").with_gram_window(8, 4));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn test_duplicate_and_empty_fields() {
        assert!(EngineConfig::with_fields(["title", "title"]).validate().is_err());
        assert!(EngineConfig::with_fields([""]).validate().is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = EngineConfig::default().with_indexer(IndexerConfig {
            num_threads: Some(0),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_fields_accept_names_and_objects() {
        let config = EngineConfig::from_json_str(
            r#"{
                "fields": ["title", {"name": "content", "min_gram_size": 2}],
                "unknown_field_policy": "reject",
                "indexer": {"parallel": false, "max_postings": 1000}
            }"#,
        )
        .unwrap();

        assert_eq!(config.fields[0], FieldConfig::new("title"));
        assert_eq!(config.gram_window(&config.fields[1]), (2, 40));
        assert_eq!(config.unknown_field_policy, UnknownFieldPolicy::Reject);
        assert!(!config.indexer.parallel);
        assert_eq!(config.indexer.max_postings, Some(1000));
        assert_eq!(config.indexer.num_threads, None);
    }

    #[test]
    fn test_json_invalid_window_is_rejected() {
        let result = EngineConfig::from_json_str(r#"{"min_gram_size": 5, "max_gram_size": 4}"#);
        assert!(matches!(result, Err(KopisError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_json_syntax_error() {
        let result = EngineConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(KopisError::Json(_))));
    }

    #[test]
    fn test_effective_threads() {
        let config = IndexerConfig {
            num_threads: Some(3),
            ..Default::default()
        };
        assert_eq!(config.effective_threads(), 3);
        assert!(IndexerConfig::default().effective_threads() >= 1);
    }
}
