//! High-level substring search engine.
//!
//! [`SearchEngine`] owns everything a deployment needs: the per-field
//! analyzers, the indexer, the searcher, and the slot serving the current
//! index. It is built once from an [`EngineConfig`] and shared by reference
//! (or `Arc`) between whatever feeds it records and whatever queries it.
//!
//! # Examples
//!
//! ```
//! use kopis::config::EngineConfig;
//! use kopis::document::document::Document;
//! use kopis::engine::SearchEngine;
//!
//! let engine = SearchEngine::new(EngineConfig::with_fields(["title", "content"])).unwrap();
//! engine
//!     .rebuild_index(&[
//!         Document::builder("1").add_text("content", "public comment").build(),
//!         Document::builder("2").add_text("content", "private note").build(),
//!     ])
//!     .unwrap();
//!
//! let hits = engine.search("C COM", &["content"]).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].as_str(), "1");
//! ```

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::info;
use tokio::task::JoinHandle;

use crate::analysis::analyzer::PerFieldAnalyzer;
use crate::config::EngineConfig;
use crate::document::document::{DocId, Document};
use crate::error::{KopisError, Result};
use crate::index::inverted_index::{IndexStats, InvertedIndex};
use crate::index::store::IndexStore;
use crate::indexer::{BuiltIndex, Indexer, RebuildStats, check_cancelled};
use crate::search::request::{SearchRequest, SearchResults};
use crate::search::searcher::Searcher;

/// A substring search engine over a rebuildable in-memory index.
#[derive(Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    analyzer: Arc<PerFieldAnalyzer>,
    indexer: Indexer,
    searcher: Searcher,
    store: IndexStore,
}

impl SearchEngine {
    /// Create an engine serving an empty index over the configured fields.
    ///
    /// # Errors
    ///
    /// Returns [`KopisError::InvalidConfiguration`] if the configuration
    /// does not validate.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let analyzer = Arc::new(PerFieldAnalyzer::from_config(&config)?);
        let indexer = Indexer::new(Arc::clone(&analyzer), config.indexer.clone())?;
        let searcher = Searcher::new(Arc::clone(&analyzer), config.unknown_field_policy);
        let store = IndexStore::new(InvertedIndex::with_fields(config.field_names()));

        info!(
            "Created search engine with fields {:?} and gram window {}..={}",
            config.field_names(),
            config.min_gram_size,
            config.max_gram_size
        );

        Ok(SearchEngine {
            config,
            analyzer,
            indexer,
            searcher,
            store,
        })
    }

    /// Rebuild the index from `documents` over the configured fields.
    ///
    /// Blocks until the new index is built and published. On error the
    /// previously served index keeps serving.
    pub fn rebuild_index(&self, documents: &[Document]) -> Result<RebuildStats> {
        let fields = self.config.field_names();
        self.rebuild_index_with_fields(documents, &fields)
    }

    /// Rebuild the index from `documents` over an explicit set of fields.
    pub fn rebuild_index_with_fields<S: AsRef<str>>(
        &self,
        documents: &[Document],
        fields: &[S],
    ) -> Result<RebuildStats> {
        let built = self.indexer.rebuild_all(documents, fields)?;
        Ok(self.publish(built))
    }

    /// Rebuild over the configured fields, aborting once `cancel` is set.
    ///
    /// A cancelled rebuild returns [`KopisError::OperationCancelled`] and
    /// leaves the served index untouched.
    pub fn rebuild_index_cancellable(
        &self,
        documents: &[Document],
        cancel: &AtomicBool,
    ) -> Result<RebuildStats> {
        let fields = self.config.field_names();
        let built = self
            .indexer
            .rebuild_all_with_cancel(documents, &fields, cancel)?;
        // The flag may have been set after the last document was indexed.
        check_cancelled(Some(cancel))?;
        Ok(self.publish(built))
    }

    /// Run [`SearchEngine::rebuild_index`] on tokio's blocking thread pool.
    ///
    /// Must be called from within a tokio runtime. Searches keep being
    /// answered by the current index while the rebuild runs.
    pub fn rebuild_index_async(
        self: &Arc<Self>,
        documents: Vec<Document>,
    ) -> JoinHandle<Result<RebuildStats>> {
        let engine = Arc::clone(self);
        tokio::task::spawn_blocking(move || engine.rebuild_index(&documents))
    }

    fn publish(&self, built: BuiltIndex) -> RebuildStats {
        let BuiltIndex { index, mut stats } = built;
        let previous = self.store.rebuild(index);
        stats.generation = previous.generation() + 1;
        stats
    }

    /// Ids of documents whose value of any of `fields` contains `keyword`,
    /// ignoring case, in ascending order.
    pub fn search<S: AsRef<str>>(&self, keyword: &str, fields: &[S]) -> Result<Vec<DocId>> {
        let index = self.store.current();
        let hits = self.searcher.search(&index, keyword, fields)?;
        Ok(hits.into_iter().collect())
    }

    /// Run a paged search request.
    pub fn search_request(&self, request: &SearchRequest) -> Result<SearchResults> {
        let index = self.store.current();
        self.searcher.execute(&index, request)
    }

    /// Statistics of the served index.
    pub fn stats(&self) -> IndexStats {
        self.store.current().stats()
    }

    /// Generation of the served index; 0 before the first rebuild.
    pub fn generation(&self) -> u64 {
        self.store.generation()
    }

    /// The served index.
    pub fn index(&self) -> Arc<InvertedIndex> {
        self.store.current()
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The per-field analyzers.
    pub fn analyzer(&self) -> &Arc<PerFieldAnalyzer> {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IndexerConfig, UnknownFieldPolicy};

    fn engine() -> SearchEngine {
        SearchEngine::new(EngineConfig::with_fields(["title", "author"])).unwrap()
    }

    fn docs() -> Vec<Document> {
        vec![
            Document::builder("1")
                .add_text("title", "Happy Days")
                .add_text("author", "Cesar")
                .build(),
            Document::builder("2")
                .add_text("title", "Gray Days")
                .add_text("author", "Ana")
                .build(),
        ]
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = SearchEngine::new(EngineConfig::default().with_gram_window(5, 2));
        assert!(matches!(result, Err(KopisError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_search_before_first_rebuild() {
        let engine = engine();
        assert_eq!(engine.generation(), 0);
        assert!(engine.search("days", &["title"]).unwrap().is_empty());
    }

    #[test]
    fn test_rebuild_and_search() {
        let engine = engine();
        let stats = engine.rebuild_index(&docs()).unwrap();

        assert_eq!(stats.documents, 2);
        assert_eq!(stats.fields, 2);
        assert_eq!(stats.generation, 1);
        assert_eq!(
            engine.search("DAYS", &["title"]).unwrap(),
            vec![DocId::from("1"), DocId::from("2")]
        );
        assert_eq!(engine.search("esa", &["author"]).unwrap(), vec![DocId::from("1")]);
    }

    #[test]
    fn test_rebuild_with_explicit_fields() {
        let engine = engine();
        engine.rebuild_index_with_fields(&docs(), &["author"]).unwrap();

        assert_eq!(engine.search("ana", &["author"]).unwrap().len(), 1);
        assert!(engine.search("happy", &["title"]).unwrap().is_empty());
        assert_eq!(engine.index().field_names(), vec!["author"]);
    }

    #[test]
    fn test_failed_rebuild_keeps_serving_previous_index() {
        let config = EngineConfig::with_fields(["title", "author"]).with_indexer(IndexerConfig {
            parallel: false,
            max_postings: Some(200),
            ..Default::default()
        });
        let engine = SearchEngine::new(config).unwrap();
        engine.rebuild_index(&docs()).unwrap();

        let huge = vec![
            Document::builder("3")
                .add_text("title", "a much longer title that produces far too many grams")
                .build(),
        ];
        let result = engine.rebuild_index(&huge);

        assert!(matches!(result, Err(KopisError::RebuildFailure(_))));
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.search("happy", &["title"]).unwrap(), vec![DocId::from("1")]);
    }

    #[test]
    fn test_cancelled_rebuild_keeps_serving_previous_index() {
        let engine = engine();
        engine.rebuild_index(&docs()).unwrap();

        let cancel = AtomicBool::new(true);
        let result = engine.rebuild_index_cancellable(&docs(), &cancel);
        assert!(matches!(result, Err(KopisError::OperationCancelled(_))));
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.search("happy", &["title"]).unwrap(), vec![DocId::from("1")]);
    }

    #[test]
    fn test_cancelled_rebuild_of_empty_set_keeps_serving_previous_index() {
        let engine = engine();
        engine.rebuild_index(&docs()).unwrap();

        let result = engine.rebuild_index_cancellable(&[], &AtomicBool::new(true));

        assert!(matches!(result, Err(KopisError::OperationCancelled(_))));
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.stats().doc_count, 2);
        assert_eq!(engine.search("happy", &["title"]).unwrap(), vec![DocId::from("1")]);
    }

    #[test]
    fn test_uncancelled_rebuild_publishes() {
        let engine = engine();
        let stats = engine
            .rebuild_index_cancellable(&docs(), &AtomicBool::new(false))
            .unwrap();

        assert_eq!(stats.generation, 1);
        assert_eq!(engine.search("ana", &["author"]).unwrap(), vec![DocId::from("2")]);
    }

    #[test]
    fn test_search_request_reports_generation() {
        let engine = engine();
        engine.rebuild_index(&docs()).unwrap();
        engine.rebuild_index(&docs()).unwrap();

        let results = engine
            .search_request(&SearchRequest::new("days").field("title").limit(1))
            .unwrap();

        assert_eq!(results.total_hits, 2);
        assert_eq!(results.doc_ids, vec![DocId::from("1")]);
        assert_eq!(results.generation, 2);
    }

    #[test]
    fn test_reject_policy_surfaces_unknown_fields() {
        let config = EngineConfig::with_fields(["title"])
            .with_unknown_field_policy(UnknownFieldPolicy::Reject);
        let engine = SearchEngine::new(config).unwrap();

        assert!(matches!(
            engine.search("x", &["author"]),
            Err(KopisError::FieldNotIndexed(_))
        ));
    }

    #[test]
    fn test_stats() {
        let engine = engine();
        engine.rebuild_index(&docs()).unwrap();
        let stats = engine.stats();

        assert_eq!(stats.doc_count, 2);
        assert_eq!(stats.field_count, 2);
        assert_eq!(stats.generation, 1);
        assert!(stats.posting_count >= stats.term_count);
    }
}
