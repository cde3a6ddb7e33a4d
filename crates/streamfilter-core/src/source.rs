//! Stream event sources declared in a service definition.
//!
//! Finds the functions that consume DynamoDB streams, resolves each stream to
//! its table name and builds the [`EventFilter`] for it.

use std::collections::HashMap;

use streamfilter_model::{FunctionDefinition, ServiceDefinition, StreamArn, StreamEventDefinition};
use tracing::warn;

use crate::filter::EventFilter;
use crate::pattern::PatternError;

/// Errors raised while resolving stream event sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A stream reference has no entry in the configured table names.
    #[error("no table name configured for stream reference '{reference}'")]
    MissingTableMapping {
        /// The unresolved reference.
        reference: String,
    },

    /// A `GetAtt` pair points at a resource without `Properties.TableName`.
    #[error("resource '{resource}' does not declare Properties.TableName")]
    MissingResourceTableName {
        /// Logical resource id.
        resource: String,
    },

    /// A literal ARN is not a DynamoDB table stream ARN.
    #[error("invalid DynamoDB stream ARN '{arn}'")]
    InvalidArn {
        /// The offending ARN.
        arn: String,
    },

    /// A `GetAtt` pair names an attribute other than `StreamArn`.
    #[error("unsupported attribute '{attribute}' on resource '{resource}', expected StreamArn")]
    UnsupportedAttribute {
        /// Logical resource id.
        resource: String,
        /// Attribute name.
        attribute: String,
    },

    /// A filter pattern of the stream event does not decode.
    #[error("invalid filter pattern for function '{function}': {source}")]
    Pattern {
        /// Function key in the service definition.
        function: String,
        /// Underlying decode error.
        #[source]
        source: PatternError,
    },
}

/// A function together with its DynamoDB stream events.
#[derive(Debug, Clone)]
pub struct FunctionWithStreamEvents<'a> {
    /// Function key in the service definition.
    pub key: &'a str,
    /// The function definition.
    pub function: &'a FunctionDefinition,
    /// Its DynamoDB stream events, in declaration order.
    pub stream_events: Vec<&'a StreamEventDefinition>,
}

/// A resolved, ready to consume stream source.
#[derive(Debug, Clone)]
pub struct StreamSource<'a> {
    /// Function key in the service definition.
    pub function: &'a str,
    /// Table whose stream feeds the function.
    pub table_name: String,
    /// The stream event definition.
    pub definition: &'a StreamEventDefinition,
    /// Decoded filter patterns of the definition.
    pub filter: EventFilter,
}

/// Keep the functions with at least one DynamoDB stream event, in key order.
#[must_use]
pub fn functions_with_stream_events(service: &ServiceDefinition) -> Vec<FunctionWithStreamEvents<'_>> {
    service
        .functions
        .iter()
        .filter_map(|(key, function)| {
            let stream_events = function.dynamodb_stream_events();
            if stream_events.is_empty() {
                None
            } else {
                Some(FunctionWithStreamEvents {
                    key,
                    function,
                    stream_events,
                })
            }
        })
        .collect()
}

/// Stream events of `function` that are not explicitly disabled.
#[must_use]
pub fn enabled_stream_events(function: &FunctionDefinition) -> Vec<&StreamEventDefinition> {
    function
        .dynamodb_stream_events()
        .into_iter()
        .filter(|def| def.is_enabled())
        .collect()
}

/// Decode the filter patterns of one stream event definition.
///
/// # Errors
///
/// Returns `PatternError` if any pattern does not decode.
pub fn stream_filter(definition: &StreamEventDefinition) -> Result<EventFilter, PatternError> {
    EventFilter::from_values(&definition.filter_patterns)
}

/// Resolve the table a stream ARN belongs to.
///
/// - `arn:aws:dynamodb:<region>:<account>:table/<name>/stream/<label>` yields `<name>`.
/// - A bare reference is looked up in `table_names`.
/// - `[resource, "StreamArn"]` yields `Resources.<resource>.Properties.TableName`
///   from the `resources` block.
///
/// # Errors
///
/// Returns `SourceError` when the ARN cannot be resolved.
pub fn resolve_table_name(
    arn: &StreamArn,
    table_names: &HashMap<String, String>,
    resources: &serde_json::Value,
) -> Result<String, SourceError> {
    match arn {
        StreamArn::Arn(arn) => table_name_from_arn(arn),
        StreamArn::Reference(reference) => {
            table_names
                .get(reference)
                .cloned()
                .ok_or_else(|| SourceError::MissingTableMapping {
                    reference: reference.clone(),
                })
        }
        StreamArn::GetAtt {
            resource,
            attribute,
        } => {
            if attribute != "StreamArn" {
                return Err(SourceError::UnsupportedAttribute {
                    resource: resource.clone(),
                    attribute: attribute.clone(),
                });
            }
            resources
                .get("Resources")
                .and_then(|r| r.get(resource))
                .and_then(|r| r.get("Properties"))
                .and_then(|p| p.get("TableName"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| SourceError::MissingResourceTableName {
                    resource: resource.clone(),
                })
        }
    }
}

fn table_name_from_arn(arn: &str) -> Result<String, SourceError> {
    let invalid = || SourceError::InvalidArn { arn: arn.to_owned() };
    // arn:partition:service:region:account:resource
    let mut parts = arn.splitn(6, ':');
    if parts.next() != Some("arn") {
        return Err(invalid());
    }
    let service = parts.nth(1).ok_or_else(invalid)?;
    if service != "dynamodb" {
        return Err(invalid());
    }
    let resource = parts.nth(2).ok_or_else(invalid)?;
    let mut segments = resource.split('/');
    match (segments.next(), segments.next()) {
        (Some("table"), Some(name)) if !name.is_empty() => Ok(name.to_owned()),
        _ => Err(invalid()),
    }
}

/// Resolve every enabled DynamoDB stream source of `service`.
///
/// Definitions whose table cannot be resolved are skipped with a warning;
/// an undecodable filter pattern fails the whole call.
///
/// # Errors
///
/// Returns `SourceError::Pattern` for the first invalid filter pattern.
pub fn stream_sources<'a>(
    service: &'a ServiceDefinition,
    table_names: &HashMap<String, String>,
) -> Result<Vec<StreamSource<'a>>, SourceError> {
    let mut sources = Vec::new();
    for entry in functions_with_stream_events(service) {
        for definition in enabled_stream_events(entry.function) {
            let filter = stream_filter(definition).map_err(|source| SourceError::Pattern {
                function: entry.key.to_owned(),
                source,
            })?;
            match resolve_table_name(&definition.arn, table_names, &service.resources) {
                Ok(table_name) => sources.push(StreamSource {
                    function: entry.key,
                    table_name,
                    definition,
                    filter,
                }),
                Err(err) => {
                    warn!(function = entry.key, arn = %definition.arn, error = %err, "skipping stream event");
                }
            }
        }
    }
    Ok(sources)
}
