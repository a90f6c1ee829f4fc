//! Search request and result types.

use serde::{Deserialize, Serialize};

use crate::document::document::DocId;

/// A keyword to look for in a set of fields.
///
/// # Examples
///
/// ```
/// use kopis::search::request::SearchRequest;
///
/// let request = SearchRequest::new("happy ")
///     .fields(["title", "author", "content"])
///     .limit(10);
///
/// assert_eq!(request.fields.len(), 3);
/// assert_eq!(request.limit, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Text to find, matched case-insensitively as a contiguous substring.
    pub keyword: String,
    /// Fields to search; a document matches if any of them matches.
    pub fields: Vec<String>,
    /// Maximum number of ids to return.
    pub limit: Option<usize>,
    /// Number of ids to skip.
    pub offset: usize,
}

impl SearchRequest {
    /// Create a request with no fields.
    pub fn new<S: Into<String>>(keyword: S) -> Self {
        SearchRequest {
            keyword: keyword.into(),
            fields: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    /// Add one field.
    pub fn field<S: Into<String>>(mut self, field: S) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add several fields.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Return at most `limit` ids.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first `offset` ids.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Result of a [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching ids in ascending order, after paging.
    pub doc_ids: Vec<DocId>,
    /// Number of matching documents before paging.
    pub total_hits: usize,
    /// Generation of the index that answered.
    pub generation: u64,
}
