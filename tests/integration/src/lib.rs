//! Integration tests for StreamFilter.
//!
//! These exercise the public surface of `streamfilter-core` end to end: JSON
//! patterns and JSON change records go in, delivery decisions come out.
//!
//! Run them with:
//! ```text
//! cargo test -p streamfilter-integration
//! ```

use std::sync::Once;

use serde_json::Value;
use streamfilter_core::{EventFilter, FilterPattern, allow_event};
use streamfilter_model::EventNode;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Decode a filter pattern, panicking on grammar errors.
#[must_use]
pub fn pattern(value: Value) -> FilterPattern {
    init_tracing();
    FilterPattern::from_json(&value).unwrap_or_else(|e| panic!("invalid pattern {value}: {e}"))
}

/// Decode a change record, panicking on malformed input.
#[must_use]
pub fn record(value: Value) -> EventNode {
    EventNode::from_json(value.clone()).unwrap_or_else(|e| panic!("invalid record {value}: {e}"))
}

/// A record whose `dynamodb.Keys.prop1` holds `value`, or no `prop1` for `None`.
#[must_use]
pub fn prop1_record(value: Option<Value>) -> EventNode {
    let keys = match value {
        Some(v) => serde_json::json!({"prop1": v}),
        None => serde_json::json!({}),
    };
    record(serde_json::json!({"dynamodb": {"Keys": keys}}))
}

/// A pattern constraining `dynamodb.Keys.prop1` with `filter`.
#[must_use]
pub fn prop1_pattern(filter: Value) -> FilterPattern {
    pattern(serde_json::json!({"dynamodb": {"Keys": {"prop1": filter}}}))
}

/// Evaluate a single pattern against a single record.
#[must_use]
pub fn allows(pattern: &FilterPattern, record: &EventNode) -> bool {
    allow_event(std::slice::from_ref(pattern), record)
}

/// Build an [`EventFilter`] from a JSON pattern list.
#[must_use]
pub fn event_filter(patterns: &Value) -> EventFilter {
    init_tracing();
    EventFilter::from_values(patterns.as_array().map_or(&[][..], Vec::as_slice))
        .unwrap_or_else(|e| panic!("invalid patterns {patterns}: {e}"))
}

mod test_filter_grammar;
mod test_filter_patterns;
