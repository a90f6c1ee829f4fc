//! The query engine.
//!
//! A keyword is normalized once with the query pipeline (whole value,
//! lowercase, no n-grams) and looked up as a single term in each requested
//! field. The per-field posting sets are unioned: a document matches if the
//! keyword occurs in any of the fields.

use std::sync::Arc;

use log::{debug, warn};

use crate::analysis::analyzer::PerFieldAnalyzer;
use crate::config::UnknownFieldPolicy;
use crate::error::{KopisError, Result};
use crate::index::inverted_index::{InvertedIndex, PostingSet};
use crate::search::request::{SearchRequest, SearchResults};

/// Resolves keywords against an [`InvertedIndex`].
#[derive(Debug, Clone)]
pub struct Searcher {
    analyzer: Arc<PerFieldAnalyzer>,
    unknown_field_policy: UnknownFieldPolicy,
}

impl Searcher {
    /// Create a searcher normalizing keywords with `analyzer`.
    pub fn new(analyzer: Arc<PerFieldAnalyzer>, unknown_field_policy: UnknownFieldPolicy) -> Self {
        Self {
            analyzer,
            unknown_field_policy,
        }
    }

    /// Ids of documents whose value of any of `fields` contains `keyword`.
    ///
    /// Field names are checked against the unknown-field policy before the
    /// keyword is looked at. An empty keyword or an empty field list matches
    /// nothing. A keyword longer than the field's maximum gram size matches
    /// nothing either, since no term that long was ever indexed.
    pub fn search<S: AsRef<str>>(
        &self,
        index: &InvertedIndex,
        keyword: &str,
        fields: &[S],
    ) -> Result<PostingSet> {
        let mut hits = PostingSet::new();
        let mut known = Vec::with_capacity(fields.len());
        for field in fields {
            let field = field.as_ref();
            if index.has_field(field) {
                known.push(field);
                continue;
            }
            match self.unknown_field_policy {
                UnknownFieldPolicy::Ignore => {
                    warn!("Field '{field}' is not indexed; it contributes no hits");
                }
                UnknownFieldPolicy::Reject => {
                    return Err(KopisError::field_not_indexed(field));
                }
            }
        }

        if known.is_empty() {
            return Ok(hits);
        }
        let Some(term) = self.analyzer.query_term(keyword)? else {
            return Ok(hits);
        };

        for &field in &known {
            if let Some(postings) = index.postings(field, &term) {
                hits.extend(postings.iter().cloned());
            }
        }

        debug!(
            "Term '{term}' matched {} documents across {} fields",
            hits.len(),
            known.len()
        );
        Ok(hits)
    }

    /// Run a request, applying its paging.
    pub fn execute(&self, index: &InvertedIndex, request: &SearchRequest) -> Result<SearchResults> {
        let hits = self.search(index, &request.keyword, &request.fields)?;
        let total_hits = hits.len();
        let doc_ids = hits
            .into_iter()
            .skip(request.offset)
            .take(request.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(SearchResults {
            doc_ids,
            total_hits,
            generation: index.generation(),
        })
    }
}
