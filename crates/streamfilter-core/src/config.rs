//! Configuration for stream filtering.
//!
//! All configuration is driven by environment variables.

use std::collections::HashMap;

/// Default number of records per handler invocation.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Stream filter configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamFilterConfig {
    /// Default AWS region.
    pub default_region: String,
    /// Log level.
    pub log_level: String,
    /// Stream reference to table name mapping.
    pub table_names: HashMap<String, String>,
    /// Maximum records per batch.
    pub batch_size: usize,
}

impl Default for StreamFilterConfig {
    fn default() -> Self {
        Self {
            default_region: "us-east-1".to_owned(),
            log_level: "info".to_owned(),
            table_names: HashMap::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl StreamFilterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        } else if lookup("SLS_DEBUG").is_some() {
            config.log_level = "debug".to_owned();
        }
        if let Some(v) = lookup("STREAM_TABLE_NAMES") {
            config.table_names = parse_table_names(&v);
        }
        if let Some(v) = lookup("STREAM_BATCH_SIZE") {
            match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.batch_size = n,
                _ => tracing::warn!(value = %v, "ignoring invalid STREAM_BATCH_SIZE"),
            }
        }

        config
    }
}

/// Parse a `ref=table,ref2=table2` mapping, skipping malformed entries.
#[must_use]
pub fn parse_table_names(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|entry| {
            let (reference, table) = entry.split_once('=')?;
            let (reference, table) = (reference.trim(), table.trim());
            if reference.is_empty() || table.is_empty() {
                None
            } else {
                Some((reference.to_owned(), table.to_owned()))
            }
        })
        .collect()
}
