//! Decoding change records from text.
//!
//! Records arrive either as one `{"Records": [...]}` document, as a single
//! record, or as NDJSON with one record per line.

use serde_json::Value;
use streamfilter_model::{EventNode, StreamBatch};

use crate::error::{StreamFilterError, StreamFilterResult};

/// Decode a single change record from JSON text.
///
/// # Errors
///
/// Returns `StreamFilterError::Json` if the text is not a valid record.
pub fn parse_record(json: &str) -> StreamFilterResult<EventNode> {
    let value: Value = serde_json::from_str(json)?;
    Ok(EventNode::from_json(value)?)
}

/// Decode every record in `text`.
///
/// A `{"Records": [...]}` document yields its records in order; any other
/// single JSON value is one record. Otherwise the text is read as NDJSON and
/// blank lines are skipped.
///
/// # Errors
///
/// Returns `StreamFilterError::Json` for an invalid batch document and
/// `StreamFilterError::Record` with the line number for a bad NDJSON line.
pub fn parse_records(text: &str) -> StreamFilterResult<Vec<EventNode>> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.get("Records").is_some_and(Value::is_array) {
            let batch: StreamBatch = serde_json::from_value(value)?;
            return Ok(batch.records);
        }
        return Ok(vec![EventNode::from_json(value)?]);
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_record(line).map_err(|e| match e {
                StreamFilterError::Json(source) => StreamFilterError::Record {
                    line: idx + 1,
                    source,
                },
                other => other,
            })
        })
        .collect()
}
