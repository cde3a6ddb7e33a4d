//! Error types for stream filtering.

use crate::pattern::PatternError;
use crate::source::SourceError;

/// Top-level error type for stream filtering.
#[derive(Debug, thiserror::Error)]
pub enum StreamFilterError {
    /// A filter pattern is outside the grammar.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A stream event source could not be resolved.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A change record or definition is not valid JSON.
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// One line of an NDJSON record stream is not a valid record.
    #[error("invalid record on line {line}: {source}")]
    Record {
        /// 1-based line number.
        line: usize,
        /// The decode error for that line.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience result type for stream filtering operations.
pub type StreamFilterResult<T> = Result<T, StreamFilterError>;
