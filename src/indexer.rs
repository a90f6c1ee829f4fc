//! Full-rebuild indexer.
//!
//! The indexer analyzes every configured field of every document with the
//! indexing pipeline and collects the resulting terms into a brand-new
//! [`InvertedIndex`]. It never touches the index being served; publishing
//! the result is the caller's job (see [`crate::index::store::IndexStore`]).
//!
//! With `parallel` enabled, documents are analyzed on a rayon thread pool.
//! Each worker fills a private partial index and the partials are merged
//! before anything is returned.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{AnalysisMode, PerFieldAnalyzer};
use crate::config::IndexerConfig;
use crate::document::document::Document;
use crate::document::field_value::FieldValue;
use crate::error::{KopisError, Result};
use crate::index::inverted_index::InvertedIndex;

/// Summary of one rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildStats {
    /// Documents scanned.
    pub documents: usize,
    /// Fields indexed.
    pub fields: usize,
    /// Field values skipped because they were missing, null, or not text.
    pub skipped_values: usize,
    /// Distinct (field, term) keys in the new index.
    pub terms: usize,
    /// Postings in the new index.
    pub postings: usize,
    /// Wall-clock build time.
    pub duration_ms: u64,
    /// Generation the index was published under; 0 until published.
    pub generation: u64,
}

/// A finished, not yet published index.
#[derive(Debug)]
pub struct BuiltIndex {
    pub index: InvertedIndex,
    pub stats: RebuildStats,
}

/// Partial result of one worker.
struct Partial {
    index: InvertedIndex,
    skipped: usize,
}

impl Partial {
    fn new(fields: &[&str]) -> Self {
        Partial {
            index: InvertedIndex::with_fields(fields.iter().copied()),
            skipped: 0,
        }
    }

    fn merge(&mut self, other: Partial) {
        self.index.merge(other.index);
        self.skipped += other.skipped;
    }
}

/// Builds inverted indexes from document sets.
pub struct Indexer {
    analyzer: Arc<PerFieldAnalyzer>,
    config: IndexerConfig,
    thread_pool: Option<Arc<ThreadPool>>,
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("config", &self.config)
            .field(
                "threads",
                &self.thread_pool.as_ref().map(|p| p.current_num_threads()),
            )
            .finish()
    }
}

impl Indexer {
    /// Create an indexer using `analyzer` for every field.
    pub fn new(analyzer: Arc<PerFieldAnalyzer>, config: IndexerConfig) -> Result<Self> {
        if config.num_threads == Some(0) {
            return Err(KopisError::invalid_config("num_threads must be at least 1"));
        }

        let thread_pool = if config.parallel {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.effective_threads())
                .thread_name(|i| format!("kopis-indexer-{i}"))
                .build()
                .map_err(|e| KopisError::other(format!("Failed to create thread pool: {e}")))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self {
            analyzer,
            config,
            thread_pool,
        })
    }

    /// Build a new index from `documents` over `fields`.
    ///
    /// Blocks until every document has been processed. A field value that is
    /// missing, null, or not text is skipped for that document only. Any
    /// error aborts the whole build and nothing is returned.
    pub fn rebuild_all<S: AsRef<str>>(
        &self,
        documents: &[Document],
        fields: &[S],
    ) -> Result<BuiltIndex> {
        self.build(documents, fields, None)
    }

    /// Like [`Indexer::rebuild_all`], but gives up with
    /// [`KopisError::OperationCancelled`] once `cancel` is set.
    pub fn rebuild_all_with_cancel<S: AsRef<str>>(
        &self,
        documents: &[Document],
        fields: &[S],
        cancel: &AtomicBool,
    ) -> Result<BuiltIndex> {
        self.build(documents, fields, Some(cancel))
    }

    fn build<S: AsRef<str>>(
        &self,
        documents: &[Document],
        fields: &[S],
        cancel: Option<&AtomicBool>,
    ) -> Result<BuiltIndex> {
        check_cancelled(cancel)?;
        let start = Instant::now();
        let fields: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
        info!(
            "Rebuilding index over {} documents and {} fields",
            documents.len(),
            fields.len()
        );

        let built = panic::catch_unwind(AssertUnwindSafe(|| match &self.thread_pool {
            Some(pool) => self.build_parallel(pool, documents, &fields, cancel),
            None => self.build_sequential(documents, &fields, cancel),
        }))
        .map_err(|payload| {
            KopisError::rebuild(format!(
                "indexing worker panicked: {}",
                panic_message(payload.as_ref())
            ))
        })??;

        let stats = RebuildStats {
            documents: documents.len(),
            fields: fields.len(),
            skipped_values: built.skipped,
            terms: built.index.term_count(),
            postings: built.index.posting_count(),
            duration_ms: start.elapsed().as_millis() as u64,
            generation: 0,
        };
        info!(
            "Built index: {} terms, {} postings, {} skipped values in {} ms",
            stats.terms, stats.postings, stats.skipped_values, stats.duration_ms
        );

        Ok(BuiltIndex {
            index: built.index,
            stats,
        })
    }

    fn build_sequential(
        &self,
        documents: &[Document],
        fields: &[&str],
        cancel: Option<&AtomicBool>,
    ) -> Result<Partial> {
        let mut partial = Partial::new(fields);
        for doc in documents {
            check_cancelled(cancel)?;
            self.index_document(doc, fields, &mut partial)?;
            self.check_budget(partial.index.posting_count())?;
        }
        Ok(partial)
    }

    fn build_parallel(
        &self,
        pool: &ThreadPool,
        documents: &[Document],
        fields: &[&str],
        cancel: Option<&AtomicBool>,
    ) -> Result<Partial> {
        pool.install(|| {
            documents
                .par_iter()
                .try_fold(
                    || Partial::new(fields),
                    |mut partial, doc| {
                        check_cancelled(cancel)?;
                        self.index_document(doc, fields, &mut partial)?;
                        self.check_budget(partial.index.posting_count())?;
                        Ok::<_, KopisError>(partial)
                    },
                )
                .try_reduce(
                    || Partial::new(fields),
                    |mut left, right| {
                        left.merge(right);
                        self.check_budget(left.index.posting_count())?;
                        Ok(left)
                    },
                )
        })
    }

    fn index_document(&self, doc: &Document, fields: &[&str], partial: &mut Partial) -> Result<()> {
        partial.index.add_document(doc.id().clone());

        for &field in fields {
            let text = match doc.get_field(field) {
                Some(FieldValue::Text(text)) => text,
                Some(other) => {
                    debug!(
                        "Skipping {} value of field '{field}' in document {}",
                        other.type_name(),
                        doc.id()
                    );
                    partial.skipped += 1;
                    continue;
                }
                None => {
                    debug!("Document {} has no field '{field}'", doc.id());
                    partial.skipped += 1;
                    continue;
                }
            };

            let tokens = self
                .analyzer
                .analyze_field(field, text, AnalysisMode::Indexing)?;
            for token in tokens {
                partial.index.put(field, &token.text, doc.id().clone());
            }
        }

        Ok(())
    }

    fn check_budget(&self, postings: usize) -> Result<()> {
        match self.config.max_postings {
            Some(max) if postings > max => Err(KopisError::rebuild(format!(
                "posting budget exhausted ({postings} > {max})"
            ))),
            _ => Ok(()),
        }
    }

    /// The indexer configuration.
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }
}

pub(crate) fn check_cancelled(cancel: Option<&AtomicBool>) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => {
            Err(KopisError::cancelled("index rebuild was cancelled"))
        }
        _ => Ok(()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
