//! Command implementations for the Kopis CLI.

use std::collections::HashMap;
use std::fs;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{EngineConfig, FieldConfig};
use crate::document::converter::DocumentConverter;
use crate::document::converter::jsonl::JsonlDocumentConverter;
use crate::document::document::{DocId, Document};
use crate::engine::SearchEngine;
use crate::error::{KopisError, Result};
use crate::search::request::SearchRequest;

/// Execute a CLI command.
pub fn execute_command(args: KopisArgs) -> Result<()> {
    match &args.command {
        Command::Index(index_args) => build_index(index_args.clone(), &args),
        Command::Search(search_args) => search_documents(search_args.clone(), &args),
    }
}

/// Build an index and report its statistics.
fn build_index(args: IndexArgs, cli_args: &KopisArgs) -> Result<()> {
    let report = run_index(&args)?;
    output_result("Index built successfully", &report, cli_args)
}

/// Build an index and search it.
fn search_documents(args: SearchArgs, cli_args: &KopisArgs) -> Result<()> {
    let report = run_search(&args)?;
    output_result("Search completed", &report, cli_args)
}

/// Load the sources, rebuild, and collect the index report.
pub fn run_index(args: &IndexArgs) -> Result<IndexReport> {
    let (engine, documents) = load_engine(&args.source)?;
    let rebuild = engine.rebuild_index(&documents)?;

    Ok(IndexReport {
        documents_file: args.source.documents.display().to_string(),
        rebuild,
        index: engine.stats(),
    })
}

/// Load the sources, rebuild, and answer the query.
pub fn run_search(args: &SearchArgs) -> Result<SearchReport> {
    let (engine, documents) = load_engine(&args.source)?;
    engine.rebuild_index(&documents)?;

    let fields: Vec<String> = if args.fields.is_empty() {
        engine
            .config()
            .field_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        args.fields.clone()
    };

    let request = SearchRequest::new(args.query.as_str())
        .fields(fields.iter().cloned())
        .limit(args.limit)
        .offset(args.offset);

    let start_time = Instant::now();
    let results = engine.search_request(&request)?;
    let duration_ms = start_time.elapsed().as_millis() as u64;

    let by_id: HashMap<&DocId, &Document> = documents.iter().map(|doc| (doc.id(), doc)).collect();
    let hits = results
        .doc_ids
        .iter()
        .map(|id| SearchHit {
            id: id.clone(),
            fields: by_id
                .get(id)
                .map(|doc| {
                    doc.fields()
                        .iter()
                        .map(|(name, value)| (name.clone(), value.to_json()))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    Ok(SearchReport {
        query: args.query.clone(),
        fields,
        total_hits: results.total_hits,
        generation: results.generation,
        duration_ms,
        hits,
    })
}

/// Resolve the configuration, create the engine, and read every record.
fn load_engine(source: &SourceArgs) -> Result<(SearchEngine, Vec<Document>)> {
    let config = load_config(source)?;
    let engine = SearchEngine::new(config)?;
    let documents = load_documents(source)?;
    Ok((engine, documents))
}

/// Read the configuration file, if any, and apply `--index-field` overrides.
///
/// Overridden fields keep the gram window the file gives them.
pub fn load_config(source: &SourceArgs) -> Result<EngineConfig> {
    let mut config = match &source.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            EngineConfig::from_json_str(&json)?
        }
        None => EngineConfig::default(),
    };

    if !source.index_fields.is_empty() {
        config.fields = source
            .index_fields
            .iter()
            .map(|name| {
                config
                    .fields
                    .iter()
                    .find(|field| &field.name == name)
                    .cloned()
                    .unwrap_or_else(|| FieldConfig::new(name.as_str()))
            })
            .collect();
    }

    if config.fields.is_empty() {
        return Err(KopisError::invalid_config(
            "no fields to index; set \"fields\" in the config file or pass --index-field",
        ));
    }
    config.validate()?;

    Ok(config)
}

/// Read every record of the JSONL source.
pub fn load_documents(source: &SourceArgs) -> Result<Vec<Document>> {
    let converter = JsonlDocumentConverter::with_id_field(source.id_field.as_str());
    let documents = converter
        .convert(&source.documents)
        .with_context(|| format!("failed to open {}", source.documents.display()))?
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Loaded {} documents from {}",
        documents.len(),
        source.documents.display()
    );
    Ok(documents)
}
