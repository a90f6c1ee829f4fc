use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use kopis::config::{EngineConfig, IndexerConfig};
use kopis::document::document::{DocId, Document};
use kopis::engine::SearchEngine;
use kopis::error::Result;

fn corpus(count: usize, word: &str) -> Vec<Document> {
    (0..count)
        .map(|i| {
            Document::builder(DocId::from(i as u64))
                .add_text("title", format!("{word} number {i}"))
                .add_text("body", format!("Body Text For Record {i}"))
                .build()
        })
        .collect()
}

fn engine_with(parallel: bool) -> Result<SearchEngine> {
    SearchEngine::new(
        EngineConfig::with_fields(["title", "body"]).with_indexer(IndexerConfig {
            parallel,
            num_threads: Some(4),
            ..Default::default()
        }),
    )
}

#[test]
fn parallel_and_sequential_rebuilds_agree() -> Result<()> {
    let docs = corpus(200, "Alpha");
    let sequential = engine_with(false)?;
    let parallel = engine_with(true)?;

    let seq_stats = sequential.rebuild_index(&docs)?;
    let par_stats = parallel.rebuild_index(&docs)?;

    assert_eq!(seq_stats.terms, par_stats.terms);
    assert_eq!(seq_stats.postings, par_stats.postings);
    for keyword in ["alpha", "NUMBER 1", "record 19", "t for r"] {
        assert_eq!(
            sequential.search(keyword, &["title", "body"])?,
            parallel.search(keyword, &["title", "body"])?
        );
    }
    Ok(())
}

#[test]
fn rebuilding_the_same_records_is_idempotent() -> Result<()> {
    let docs = corpus(50, "Alpha");
    let engine = engine_with(true)?;

    let first = engine.rebuild_index(&docs)?;
    let hits_first = engine.search("number 4", &["title"])?;
    let second = engine.rebuild_index(&docs)?;
    let hits_second = engine.search("number 4", &["title"])?;

    assert_eq!(first.terms, second.terms);
    assert_eq!(first.postings, second.postings);
    assert_eq!(hits_first, hits_second);
    assert_eq!(second.generation, first.generation + 1);
    Ok(())
}

#[test]
fn rebuild_replaces_rather_than_accumulates() -> Result<()> {
    let engine = engine_with(false)?;
    engine.rebuild_index(&corpus(10, "Alpha"))?;
    engine.rebuild_index(&corpus(10, "Omega"))?;

    assert!(engine.search("alpha", &["title"])?.is_empty());
    assert_eq!(engine.search("omega", &["title"])?.len(), 10);
    Ok(())
}

#[test]
fn searches_see_either_the_old_or_the_new_index() -> Result<()> {
    let engine = Arc::new(engine_with(true)?);
    let old = corpus(100, "Alpha");
    let new = corpus(100, "Omega");
    engine.rebuild_index(&old)?;

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let done = Arc::clone(&done);
            thread::spawn(move || -> Result<()> {
                while !done.load(Ordering::Acquire) {
                    let alpha = engine.search("alpha", &["title"])?.len();
                    let omega = engine.search("omega", &["title"])?.len();
                    // Two separate searches may straddle a swap, but each one
                    // sees a complete index.
                    assert!(alpha == 0 || alpha == 100);
                    assert!(omega == 0 || omega == 100);
                }
                Ok(())
            })
        })
        .collect();

    for round in 0..10 {
        let docs = if round % 2 == 0 { &new } else { &old };
        engine.rebuild_index(docs)?;
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().expect("reader panicked")?;
    }
    assert_eq!(engine.generation(), 11);
    Ok(())
}

#[test]
fn multi_field_search_is_the_union_of_single_field_searches() -> Result<()> {
    let engine = engine_with(false)?;
    let mut docs = corpus(20, "Alpha");
    docs.push(
        Document::builder("only-body")
            .add_text("body", "number 1 lives here")
            .build(),
    );
    engine.rebuild_index(&docs)?;

    let mut union = engine.search("number 1", &["title"])?;
    union.extend(engine.search("number 1", &["body"])?);
    union.sort();
    union.dedup();

    assert_eq!(engine.search("number 1", &["title", "body"])?, union);
    Ok(())
}

#[tokio::test]
async fn async_rebuild_publishes_without_blocking_searches() -> Result<()> {
    let engine = Arc::new(engine_with(true)?);
    engine.rebuild_index(&corpus(10, "Alpha"))?;

    let handle = engine.rebuild_index_async(corpus(500, "Omega"));
    let during = engine.search("alpha", &["title"])?.len();
    assert!(during == 0 || during == 10);

    let stats = handle.await.expect("rebuild task panicked")?;
    assert_eq!(stats.documents, 500);
    assert_eq!(stats.generation, 2);
    assert_eq!(engine.search("omega", &["title"])?.len(), 500);
    Ok(())
}
