//! Filter pattern grammar.
//!
//! Patterns are authored as JSON and decoded once into a typed AST:
//!
//! 1. **Decoding**: [`parse_pattern`] turns JSON into a [`FilterPattern`],
//!    rejecting anything outside the grammar with a [`PatternError`].
//! 2. **Matching**: the [`crate::matcher`] module walks the AST against a
//!    change record.

pub mod ast;
pub mod parser;

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

pub use ast::{
    Comparison, Filter, FilterPattern, Literal, NumericOp, NumericRule, PatternNode, Rule,
    ScalarFilter,
};
pub use parser::{PatternError, parse_pattern, parse_patterns};

impl FilterPattern {
    /// Decode a pattern from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the value is outside the pattern grammar.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PatternError> {
        parse_pattern(value)
    }

    /// Number of leaf filters in the pattern.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        fn count(node: &PatternNode) -> usize {
            match node {
                PatternNode::Leaf(_) => 1,
                PatternNode::Object(children) => children.values().map(count).sum(),
            }
        }
        self.root.values().map(count).sum()
    }
}

impl FromStr for FilterPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        parse_pattern(&value)
    }
}

impl<'de> Deserialize<'de> for FilterPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        parse_pattern(&value).map_err(serde::de::Error::custom)
    }
}
