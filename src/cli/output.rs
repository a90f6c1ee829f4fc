//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::args::{KopisArgs, OutputFormat};
use crate::document::document::DocId;
use crate::error::Result;
use crate::index::inverted_index::IndexStats;
use crate::indexer::RebuildStats;

/// Result structure for the `index` command.
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub documents_file: String,
    pub rebuild: RebuildStats,
    pub index: IndexStats,
}

/// One matching record.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: DocId,
    pub fields: Map<String, Value>,
}

/// Result structure for the `search` command.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub fields: Vec<String>,
    pub total_hits: usize,
    pub generation: u64,
    pub duration_ms: u64,
    pub hits: Vec<SearchHit>,
}

/// Results that know how to print themselves for a terminal.
pub trait HumanReadable {
    fn render_human(&self) -> String;
}

impl HumanReadable for IndexReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Index Statistics ({})", self.documents_file);
        let _ = writeln!(out, "═════════════════");
        let _ = writeln!(out, "Documents:       {}", self.rebuild.documents);
        let _ = writeln!(out, "Fields:          {}", self.rebuild.fields);
        let _ = writeln!(out, "Skipped values:  {}", self.rebuild.skipped_values);
        let _ = writeln!(out, "Terms:           {}", self.index.term_count);
        let _ = writeln!(out, "Postings:        {}", self.index.posting_count);
        let _ = writeln!(out, "Generation:      {}", self.index.generation);
        let _ = writeln!(out, "Build time:      {}ms", self.rebuild.duration_ms);
        out
    }
}

impl HumanReadable for SearchReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Search Results:");
        let _ = writeln!(out, "═══════════════");

        for (i, hit) in self.hits.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Result {}: {}", i + 1, hit.id);
            let _ = writeln!(out, "─────────────");

            let mut names: Vec<&String> = hit.fields.keys().collect();
            names.sort();
            for name in names {
                match &hit.fields[name] {
                    Value::String(text) => {
                        let _ = writeln!(out, "{name}: {text}");
                    }
                    Value::Null => {}
                    other => {
                        let _ = writeln!(out, "{name}: {other}");
                    }
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Total: {} hits for {:?} in [{}] ({}ms)",
            self.total_hits,
            self.query,
            self.fields.join(", "),
            self.duration_ms
        );
        out
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &KopisArgs) -> Result<()>
where
    T: Serialize + HumanReadable,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanReadable>(message: &str, result: &T, args: &KopisArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }
    print!("{}", result.render_human());
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &KopisArgs) -> Result<()> {
    println!("{}", to_json(result, args.pretty)?);
    Ok(())
}

/// Serialize a result, pretty-printed on request.
pub fn to_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}
