//! In-memory inverted index keyed by (field, term).

use std::collections::BTreeSet;

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::document::DocId;

/// The documents associated with one (field, term) pair.
///
/// A `BTreeSet` keeps ids ordered so results are deterministic.
pub type PostingSet = BTreeSet<DocId>;

/// Postings of a single field.
#[derive(Debug, Clone, Default)]
pub struct FieldPostings {
    terms: AHashMap<String, PostingSet>,
}

impl FieldPostings {
    /// Posting set of a term.
    pub fn get(&self, term: &str) -> Option<&PostingSet> {
        self.terms.get(term)
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Number of (term, document) pairs.
    pub fn posting_count(&self) -> usize {
        self.terms.values().map(BTreeSet::len).sum()
    }
}

/// Statistics about an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of documents the index was built from.
    pub doc_count: usize,
    /// Number of indexed fields.
    pub field_count: usize,
    /// Number of distinct (field, term) keys.
    pub term_count: usize,
    /// Number of (field, term, document) postings.
    pub posting_count: usize,
    /// Rebuild generation; 0 for the empty index served before the first rebuild.
    pub generation: u64,
    /// When the index was published, if it has been.
    pub built_at: Option<DateTime<Utc>>,
}

/// Mapping from (field, term) to posting set.
///
/// Fields are independent: the same term in two fields is two keys.
///
/// # Examples
///
/// ```
/// use kopis::document::document::DocId;
/// use kopis::index::inverted_index::InvertedIndex;
///
/// let mut index = InvertedIndex::with_fields(["title"]);
/// index.put("title", "hap", DocId::from("1"));
/// index.put("title", "hap", DocId::from("1"));
///
/// assert_eq!(index.lookup("title", "hap").len(), 1);
/// assert!(index.lookup("title", "xyz").is_empty());
/// assert!(index.lookup("author", "hap").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    fields: AHashMap<String, FieldPostings>,
    documents: AHashSet<DocId>,
    posting_count: usize,
    generation: u64,
    built_at: Option<DateTime<Utc>>,
}

impl InvertedIndex {
    /// Create an empty index with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index that already knows the given fields.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::new();
        for field in fields {
            index.add_field(field);
        }
        index
    }

    /// Register a field, even if it ends up with no terms.
    pub fn add_field<S: Into<String>>(&mut self, field: S) {
        self.fields.entry(field.into()).or_default();
    }

    /// Record that a document took part in building the index.
    pub fn add_document(&mut self, doc_id: DocId) {
        self.documents.insert(doc_id);
    }

    /// Add `doc_id` to the posting set of (field, term).
    ///
    /// Idempotent. Returns whether the posting was new.
    pub fn put(&mut self, field: &str, term: &str, doc_id: DocId) -> bool {
        if !self.fields.contains_key(field) {
            self.add_field(field);
        }
        let Some(postings) = self.fields.get_mut(field) else {
            return false;
        };
        let inserted = match postings.terms.get_mut(term) {
            Some(set) => set.insert(doc_id),
            None => {
                postings
                    .terms
                    .insert(term.to_string(), BTreeSet::from([doc_id]));
                true
            }
        };
        if inserted {
            self.posting_count += 1;
        }
        inserted
    }

    /// Posting set of (field, term), if any.
    pub fn postings(&self, field: &str, term: &str) -> Option<&PostingSet> {
        self.fields.get(field).and_then(|f| f.get(term))
    }

    /// Posting set of (field, term); empty when the term is unindexed.
    pub fn lookup(&self, field: &str, term: &str) -> PostingSet {
        self.postings(field, term).cloned().unwrap_or_default()
    }

    /// Check whether a field is part of the index.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Postings of a field.
    pub fn field(&self, field: &str) -> Option<&FieldPostings> {
        self.fields.get(field)
    }

    /// Names of the indexed fields, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fold another partial index into this one.
    pub fn merge(&mut self, other: InvertedIndex) {
        self.documents.extend(other.documents);
        for (field, other_postings) in other.fields {
            let postings = self.fields.entry(field).or_default();
            for (term, docs) in other_postings.terms {
                match postings.terms.get_mut(&term) {
                    Some(existing) => {
                        let before = existing.len();
                        existing.extend(docs);
                        self.posting_count += existing.len() - before;
                    }
                    None => {
                        self.posting_count += docs.len();
                        postings.terms.insert(term, docs);
                    }
                }
            }
        }
    }

    /// Stamp the index as published under `generation`.
    pub(crate) fn mark_published(&mut self, generation: u64) {
        self.generation = generation;
        self.built_at = Some(Utc::now());
    }

    /// Number of documents the index was built from.
    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of distinct (field, term) keys.
    pub fn term_count(&self) -> usize {
        self.fields.values().map(FieldPostings::term_count).sum()
    }

    /// Number of (field, term, document) postings.
    pub fn posting_count(&self) -> usize {
        self.posting_count
    }

    /// Generation this index was published under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Collect statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            doc_count: self.doc_count(),
            field_count: self.fields.len(),
            term_count: self.term_count(),
            posting_count: self.posting_count,
            generation: self.generation,
            built_at: self.built_at,
        }
    }
}
