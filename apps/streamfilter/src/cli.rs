//! Command line arguments.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Records per filtered batch (overrides STREAM_BATCH_SIZE)
    #[arg(long, global = true, value_parser = parse_batch_size)]
    pub batch_size: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter change records and print the delivered ones as NDJSON
    Filter(FilterArgs),
    /// List the DynamoDB stream sources of a service definition
    Streams(StreamsArgs),
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Filter pattern file: a JSON pattern or an array of patterns
    #[arg(short, long, env = "STREAM_FILTER_PATTERNS")]
    pub patterns: Option<PathBuf>,

    /// Record input: NDJSON or a {"Records": [...]} document; `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct StreamsArgs {
    /// Service definition file (JSON)
    #[arg(short, long)]
    pub service: PathBuf,
}

fn parse_batch_size(raw: &str) -> Result<usize, String> {
    raw.parse::<NonZeroUsize>()
        .map(NonZeroUsize::get)
        .map_err(|e| format!("batch size must be a positive integer: {e}"))
}
