//! The inverted index and the slot that serves it.
//!
//! [`inverted_index::InvertedIndex`] is an immutable-once-published value:
//! the indexer fills a fresh one and [`store::IndexStore`] swaps it in.

pub mod inverted_index;
pub mod store;
