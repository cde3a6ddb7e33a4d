//! Function and stream event definition types.
//!
//! These mirror the `functions.<name>.events[].stream` blocks of a serverless
//! service definition. Field names are `camelCase` on the wire. Filter patterns
//! are kept as raw JSON here; `streamfilter-core` decodes them into its
//! pattern grammar.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::EventNode;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Source service of a stream event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamType {
    /// DynamoDB Streams.
    #[serde(rename = "dynamodb")]
    Dynamodb,
    /// Kinesis Data Streams.
    #[serde(rename = "kinesis")]
    Kinesis,
    /// Any other stream source.
    #[serde(other)]
    Other,
}

impl StreamType {
    /// Returns the wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dynamodb => "dynamodb",
            Self::Kinesis => "kinesis",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a shard iterator starts reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StartingPosition {
    /// Only records written after the iterator is created.
    #[default]
    #[serde(rename = "LATEST")]
    Latest,
    /// The oldest record still retained in the shard.
    #[serde(rename = "TRIM_HORIZON")]
    TrimHorizon,
}

impl StartingPosition {
    /// Returns the wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "LATEST",
            Self::TrimHorizon => "TRIM_HORIZON",
        }
    }
}

impl std::fmt::Display for StartingPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stream ARN references
// ---------------------------------------------------------------------------

/// How a stream event names its stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStreamArn", into = "RawStreamArn")]
pub enum StreamArn {
    /// A literal ARN, e.g. `arn:aws:dynamodb:us-east-1:000000000000:table/Users/stream/...`.
    Arn(String),
    /// A name that must be mapped to a table through configuration
    /// (typically a stack output reference).
    Reference(String),
    /// A `Fn::GetAtt`-style `[resource, attribute]` pair pointing at a table
    /// defined in the same stack.
    GetAtt {
        /// Logical resource id.
        resource: String,
        /// Attribute name, `StreamArn` for tables.
        attribute: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawStreamArn {
    Text(String),
    Pair(String, String),
}

impl From<RawStreamArn> for StreamArn {
    fn from(raw: RawStreamArn) -> Self {
        match raw {
            RawStreamArn::Text(s) if s.starts_with("arn:") => Self::Arn(s),
            RawStreamArn::Text(s) => Self::Reference(s),
            RawStreamArn::Pair(resource, attribute) => Self::GetAtt {
                resource,
                attribute,
            },
        }
    }
}

impl From<StreamArn> for RawStreamArn {
    fn from(arn: StreamArn) -> Self {
        match arn {
            StreamArn::Arn(s) | StreamArn::Reference(s) => Self::Text(s),
            StreamArn::GetAtt {
                resource,
                attribute,
            } => Self::Pair(resource, attribute),
        }
    }
}

impl std::fmt::Display for StreamArn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arn(s) | Self::Reference(s) => f.write_str(s),
            Self::GetAtt {
                resource,
                attribute,
            } => write!(f, "{resource}.{attribute}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A `stream` event source attached to a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEventDefinition {
    /// Stream source type.
    #[serde(rename = "type")]
    pub stream_type: StreamType,
    /// Stream identifier.
    pub arn: StreamArn,
    /// Disabled streams are not consumed. Absent means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Maximum number of records per handler invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    /// Shard iterator start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_position: Option<StartingPosition>,
    /// Raw filter patterns; an empty list means every record is delivered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_patterns: Vec<serde_json::Value>,
}

impl StreamEventDefinition {
    /// Returns `true` for DynamoDB stream sources.
    #[must_use]
    pub fn is_dynamodb(&self) -> bool {
        self.stream_type == StreamType::Dynamodb
    }

    /// Returns `true` unless the definition is explicitly disabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

/// One entry of a function's `events` list.
///
/// Only `stream` events are interpreted; every other event kind (`http`,
/// `schedule`, ...) is preserved verbatim in `other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventDefinition {
    /// The stream event source, if this entry is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamEventDefinition>,
    /// Any other event source.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// A function declared in the service definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    /// Deployed function name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Handler entry point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    /// Event sources.
    #[serde(default)]
    pub events: Vec<EventDefinition>,
}

impl FunctionDefinition {
    /// Returns the DynamoDB stream events of this function, in declaration order.
    #[must_use]
    pub fn dynamodb_stream_events(&self) -> Vec<&StreamEventDefinition> {
        self.events
            .iter()
            .filter_map(|e| e.stream.as_ref())
            .filter(|s| s.is_dynamodb())
            .collect()
    }
}

/// A batch of stream records as handed to a handler: `{"Records": [...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamBatch {
    /// Records in shard order.
    #[serde(rename = "Records", default)]
    pub records: Vec<EventNode>,
}

/// Service definition subset needed to locate stream sources.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Functions keyed by their logical name, in a stable order.
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionDefinition>,
    /// The `resources` block (`{"Resources": {...}}`), used for `GetAtt` resolution.
    #[serde(default)]
    pub resources: serde_json::Value,
}
