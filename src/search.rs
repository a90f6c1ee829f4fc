//! Query side: normalizing a keyword and resolving it against the index.

pub mod request;
pub mod searcher;
