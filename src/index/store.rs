//! The slot holding the currently served index.

use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

use crate::index::inverted_index::InvertedIndex;

/// Holds the served [`InvertedIndex`] behind a single swappable pointer.
///
/// Readers clone the `Arc` under a short read lock and search it without
/// holding any lock. A rebuild replaces the pointer in one write, so a reader
/// sees either the old index or the new one, never a mix.
///
/// # Examples
///
/// ```
/// use kopis::document::document::DocId;
/// use kopis::index::inverted_index::InvertedIndex;
/// use kopis::index::store::IndexStore;
///
/// let store = IndexStore::new(InvertedIndex::with_fields(["title"]));
/// let before = store.current();
///
/// let mut next = InvertedIndex::with_fields(["title"]);
/// next.put("title", "abc", DocId::from("1"));
/// store.rebuild(next);
///
/// assert!(before.lookup("title", "abc").is_empty());
/// assert_eq!(store.current().lookup("title", "abc").len(), 1);
/// assert_eq!(store.generation(), 1);
/// ```
#[derive(Debug)]
pub struct IndexStore {
    current: RwLock<Arc<InvertedIndex>>,
}

impl IndexStore {
    /// Serve `initial` as generation 0.
    pub fn new(initial: InvertedIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// The currently served index.
    pub fn current(&self) -> Arc<InvertedIndex> {
        self.current.read().clone()
    }

    /// Generation of the currently served index.
    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }

    /// Publish a fully built index and return the one it replaced.
    ///
    /// The new index gets the next generation number. Searches still holding
    /// the previous `Arc` finish against the previous index.
    pub fn rebuild(&self, mut index: InvertedIndex) -> Arc<InvertedIndex> {
        let mut guard = self.current.write();
        let generation = guard.generation() + 1;
        index.mark_published(generation);
        let previous = std::mem::replace(&mut *guard, Arc::new(index));
        drop(guard);

        info!(
            "Published index generation {generation} (replaced generation {})",
            previous.generation()
        );
        previous
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new(InvertedIndex::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::DocId;
    use std::thread;

    fn index_with(doc: &str, term: &str) -> InvertedIndex {
        let mut index = InvertedIndex::with_fields(["title"]);
        index.add_document(DocId::from(doc));
        index.put("title", term, DocId::from(doc));
        index
    }

    #[test]
    fn test_rebuild_returns_previous() {
        let store = IndexStore::new(index_with("1", "old"));
        let previous = store.rebuild(index_with("2", "new"));

        assert_eq!(previous.generation(), 0);
        assert_eq!(previous.lookup("title", "old").len(), 1);
        assert_eq!(store.current().lookup("title", "new").len(), 1);
        assert!(store.current().lookup("title", "old").is_empty());
    }

    #[test]
    fn test_generations_increase() {
        let store = IndexStore::default();
        assert_eq!(store.generation(), 0);

        store.rebuild(InvertedIndex::new());
        store.rebuild(InvertedIndex::new());

        assert_eq!(store.generation(), 2);
        assert!(store.current().stats().built_at.is_some());
    }

    #[test]
    fn test_readers_see_whole_generations() {
        let store = Arc::new(IndexStore::new(index_with("0", "gen")));

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 1..=50 {
                    let mut index = InvertedIndex::with_fields(["title"]);
                    for d in 0..=i {
                        index.put("title", "gen", DocId::from(d as u64));
                    }
                    store.rebuild(index);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let index = store.current();
                        // Generation n holds exactly n + 1 postings for "gen".
                        let hits = index.lookup("title", "gen").len() as u64;
                        assert_eq!(hits, index.generation() + 1);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.generation(), 50);
    }
}
