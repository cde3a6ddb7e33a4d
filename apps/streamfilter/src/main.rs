//! StreamFilter - filter DynamoDB stream records with event filter patterns.
//!
//! # Usage
//!
//! ```text
//! streamfilter filter --patterns patterns.json --input records.ndjson
//! streamfilter streams --service service.json
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DEFAULT_REGION` | `us-east-1` | Region reported for resolved stream sources |
//! | `STREAM_TABLE_NAMES` | *(empty)* | `ref=table,...` mapping for stream references |
//! | `STREAM_BATCH_SIZE` | `100` | Records per filtered batch |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `SLS_DEBUG` | *(unset)* | When set and `LOG_LEVEL` is not, log at `debug` |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use streamfilter_core::StreamFilterConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so stdout carries only records.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = StreamFilterConfig::from_env();
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }

    init_tracing(&config.log_level, cli.log_json)?;

    match cli.command {
        Command::Filter(args) => commands::filter(&args, &config),
        Command::Streams(args) => commands::streams(&args, &config),
    }
}
