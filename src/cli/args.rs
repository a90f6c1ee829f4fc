//! Command line argument parsing for the Kopis CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Kopis - case-insensitive substring search over JSONL records
#[derive(Parser, Debug, Clone)]
#[command(name = "kopis")]
#[command(about = "Case-insensitive substring search over n-gram inverted indexes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct KopisArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl KopisArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index from a JSONL file and report its statistics
    Index(IndexArgs),

    /// Build an index from a JSONL file and search it
    Search(SearchArgs),
}

/// Where records and configuration come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "KOPIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Records to index (JSON Lines)
    #[arg(value_name = "DOCUMENTS_FILE")]
    pub documents: PathBuf,

    /// Key holding each record's id
    #[arg(long, default_value = "id")]
    pub id_field: String,

    /// Fields to index, overriding the configuration (repeatable)
    #[arg(long = "index-field", value_name = "FIELD")]
    pub index_fields: Vec<String>,
}

/// Arguments for building an index
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Text to find
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Field to search in (repeatable; default: every indexed field)
    #[arg(long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Offset for pagination
    #[arg(short, long, default_value = "0")]
    pub offset: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let args = KopisArgs::parse_from([
            "kopis", "-vv", "search", "docs.jsonl", "happy ", "--field", "title", "--field",
            "content", "--limit", "5",
        ]);

        assert_eq!(args.verbosity(), 2);
        match args.command {
            Command::Search(search) => {
                assert_eq!(search.query, "happy ");
                assert_eq!(search.fields, vec!["title", "content"]);
                assert_eq!(search.limit, 5);
                assert_eq!(search.offset, 0);
                assert_eq!(search.source.documents, PathBuf::from("docs.jsonl"));
                assert_eq!(search.source.id_field, "id");
            }
            _ => panic!("Expected search command"),
        }
    }

    #[test]
    fn test_parse_index_with_overrides() {
        let args = KopisArgs::parse_from([
            "kopis", "index", "--config", "kopis.json", "--index-field", "title", "docs.jsonl",
            "--format", "json", "-q",
        ]);

        assert_eq!(args.verbosity(), 0);
        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Index(index) => {
                assert_eq!(index.source.config, Some(PathBuf::from("kopis.json")));
                assert_eq!(index.source.index_fields, vec!["title"]);
            }
            _ => panic!("Expected index command"),
        }
    }

    #[test]
    fn test_default_verbosity() {
        let args = KopisArgs::parse_from(["kopis", "index", "docs.jsonl"]);
        assert_eq!(args.verbosity(), 1);
        assert_eq!(args.output_format, OutputFormat::Human);
    }
}
