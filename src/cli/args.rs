//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::similarity::Measure;

/// simdex - sharded text similarity search
#[derive(Parser, Debug, Clone)]
#[command(name = "simdex")]
#[command(about = "Sharded text similarity search over document collections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct SimdexArgs {
    /// Emit JSON instead of human-readable output
    #[arg(long)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute document frequencies over a document collection
    Df(DfArgs),

    /// Compare documents pairwise by textual similarity
    Sim(SimArgs),

    /// Index documents into sharded in-memory indexes and run a query
    Search(SearchArgs),
}

/// Arguments for computing document frequencies
#[derive(Parser, Debug, Clone)]
pub struct DfArgs {
    /// Document filenames
    #[arg(value_name = "DOC")]
    pub docs: Vec<String>,

    /// File containing a list of input documents, one per line
    #[arg(short, long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for pairwise comparison
#[derive(Parser, Debug, Clone)]
pub struct SimArgs {
    /// Documents to compare (at least two)
    #[arg(value_name = "DOC", required = true)]
    pub docs: Vec<String>,

    /// Similarity measure
    #[arg(short, long, value_enum, default_value = "cosine")]
    pub measure: Measure,
}

/// Arguments for indexing and searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Documents to index
    #[arg(value_name = "DOC", required = true)]
    pub docs: Vec<String>,

    /// Query text
    #[arg(short, long)]
    pub query: String,

    /// Number of index shards
    #[arg(short, long, default_value = "2")]
    pub shards: usize,

    /// Scorer name (simple_count, cosine, tfidf)
    #[arg(long, default_value = "tfidf")]
    pub scorer: String,

    /// Stopword file, whitespace separated
    #[arg(long, value_name = "FILE")]
    pub stoplist: Option<PathBuf>,
}
