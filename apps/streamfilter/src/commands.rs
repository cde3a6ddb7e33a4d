//! Subcommand implementations.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use streamfilter_core::{EventFilter, StreamFilterConfig, parse_records, stream_sources};
use streamfilter_model::{EventNode, ServiceDefinition};
use tracing::info;

use crate::cli::{FilterArgs, StreamsArgs};

/// Run `filter`: read records, write the delivered ones to stdout.
pub fn filter(args: &FilterArgs, config: &StreamFilterConfig) -> Result<()> {
    let event_filter = match &args.patterns {
        Some(path) => load_filter(path)?,
        None => EventFilter::default(),
    };
    info!(
        patterns = event_filter.len(),
        batch_size = config.batch_size,
        "filtering DynamoDB streams records"
    );

    let records = read_records(open_input(&args.input)?)?;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let delivered = write_filtered(&event_filter, records, config.batch_size, &mut out)?;
    out.flush().context("failed to flush output")?;

    info!(delivered, "done");
    Ok(())
}

/// Run `streams`: print one JSON line per resolved stream source.
pub fn streams(args: &StreamsArgs, config: &StreamFilterConfig) -> Result<()> {
    let text = std::fs::read_to_string(&args.service)
        .with_context(|| format!("failed to read {}", args.service.display()))?;
    let service: ServiceDefinition = serde_json::from_str(&text)
        .with_context(|| format!("invalid service definition {}", args.service.display()))?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_stream_sources(&service, config, &mut out)?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

fn load_filter(path: &Path) -> Result<EventFilter> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    EventFilter::from_json(&text)
        .with_context(|| format!("invalid filter patterns in {}", path.display()))
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Decode records from NDJSON or from a single `{"Records": [...]}` document.
fn read_records(mut input: impl Read) -> Result<Vec<EventNode>> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("failed to read records")?;
    parse_records(&text).context("failed to decode records")
}

/// Filter `records` in batches and write the delivered ones as NDJSON.
fn write_filtered(
    event_filter: &EventFilter,
    records: Vec<EventNode>,
    batch_size: usize,
    out: &mut impl Write,
) -> Result<usize> {
    let mut delivered = 0;
    let mut records = records.into_iter().peekable();
    while records.peek().is_some() {
        let batch: Vec<EventNode> = records.by_ref().take(batch_size.max(1)).collect();
        for record in event_filter.filter_batch(batch) {
            serde_json::to_writer(&mut *out, &record).context("failed to write record")?;
            out.write_all(b"\n").context("failed to write record")?;
            delivered += 1;
        }
    }
    Ok(delivered)
}

fn write_stream_sources(
    service: &ServiceDefinition,
    config: &StreamFilterConfig,
    out: &mut impl Write,
) -> Result<()> {
    let sources = stream_sources(service, &config.table_names)?;
    for source in &sources {
        let line = serde_json::json!({
            "function": source.function,
            "tableName": source.table_name,
            "region": config.default_region,
            "batchSize": source.definition.batch_size.unwrap_or(config.batch_size),
            "startingPosition": source.definition.starting_position.unwrap_or_default().as_str(),
            "filterPatterns": source.filter.len(),
        });
        serde_json::to_writer(&mut *out, &line).context("failed to write stream source")?;
        out.write_all(b"\n").context("failed to write stream source")?;
    }
    info!(sources = sources.len(), "resolved DynamoDB stream sources");
    Ok(())
}
