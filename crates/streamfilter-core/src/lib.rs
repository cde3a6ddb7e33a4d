//! Event filtering for DynamoDB stream records.
//!
//! Filter patterns are decoded once into a typed AST ([`pattern`]) and then
//! evaluated against change records ([`matcher`]). [`EventFilter`] wraps a
//! pattern list with the delivery policy used in front of a stream handler,
//! and [`source`] locates the stream event sources of a service definition.
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod pattern;
pub mod record;
pub mod source;

pub use config::StreamFilterConfig;
pub use error::{StreamFilterError, StreamFilterResult};
pub use filter::EventFilter;
pub use matcher::allow_event;
pub use pattern::{FilterPattern, PatternError, parse_pattern, parse_patterns};
pub use record::{parse_record, parse_records};
pub use source::{SourceError, StreamSource, resolve_table_name, stream_sources};
