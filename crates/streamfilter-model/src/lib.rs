//! DynamoDB stream model types for StreamFilter.
//!
//! This crate holds the wire-level shapes: typed `AttributeValue` containers,
//! the [`EventNode`] tree a change record is decoded into, and the function /
//! stream event definitions that declare which records a handler wants.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod event;
pub mod types;

pub use attribute_value::AttributeValue;
pub use event::EventNode;
pub use types::{
    EventDefinition, FunctionDefinition, ServiceDefinition, StartingPosition, StreamArn,
    StreamBatch, StreamEventDefinition, StreamType,
};
