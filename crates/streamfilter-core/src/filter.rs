//! Record filtering in front of a stream handler.
//!
//! [`EventFilter`] owns the decoded patterns of one stream event source and
//! applies the delivery policy: with no patterns configured every record is
//! delivered, otherwise a record is delivered when any pattern matches.

use streamfilter_model::EventNode;
use tracing::{debug, info};

use crate::matcher::allow_event;
use crate::pattern::{FilterPattern, PatternError, parse_patterns};

/// Decoded filter patterns for one stream event source.
///
/// Immutable once built; share it behind an `Arc` across shard workers.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    patterns: Vec<FilterPattern>,
}

impl EventFilter {
    /// Create a filter from already decoded patterns.
    #[must_use]
    pub fn new(patterns: Vec<FilterPattern>) -> Self {
        Self { patterns }
    }

    /// Decode patterns from raw JSON values, as found in a stream event definition.
    ///
    /// # Errors
    ///
    /// Returns the first `PatternError` encountered.
    pub fn from_values(values: &[serde_json::Value]) -> Result<Self, PatternError> {
        let patterns = values
            .iter()
            .map(FilterPattern::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns))
    }

    /// Decode patterns from a JSON document holding a pattern or a list of patterns.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the document is not valid JSON or not a valid pattern list.
    pub fn from_json(json: &str) -> Result<Self, PatternError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        parse_patterns(&value).map(Self::new)
    }

    /// The configured patterns.
    #[must_use]
    pub fn patterns(&self) -> &[FilterPattern] {
        &self.patterns
    }

    /// Number of configured patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no patterns are configured, i.e. every record is delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Decide whether a record should be delivered to the handler.
    #[must_use]
    pub fn allows(&self, record: &EventNode) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let allowed = allow_event(&self.patterns, record);
        if !allowed {
            debug!(
                event_name = record.get("eventName").and_then(EventNode::as_str),
                sequence_number = record
                    .pointer("dynamodb.SequenceNumber")
                    .and_then(EventNode::as_str),
                patterns = self.patterns.len(),
                "filtered DynamoDB streams record"
            );
        }
        allowed
    }

    /// Keep the records that should be delivered, preserving their order.
    #[must_use]
    pub fn filter_batch(&self, records: Vec<EventNode>) -> Vec<EventNode> {
        let received = records.len();
        let allowed: Vec<EventNode> = records.into_iter().filter(|r| self.allows(r)).collect();
        info!(
            received,
            allowed = allowed.len(),
            dropped = received - allowed.len(),
            "filtered DynamoDB streams batch"
        );
        allowed
    }
}

impl From<Vec<FilterPattern>> for EventFilter {
    fn from(patterns: Vec<FilterPattern>) -> Self {
        Self::new(patterns)
    }
}
