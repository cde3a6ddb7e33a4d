//! Decoder from JSON filter patterns to the pattern AST.
//!
//! Decoding happens once, when a pattern is loaded. Every grammar violation,
//! including an unknown numeric operator, is reported here so evaluation
//! itself never fails.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::ast::{
    Comparison, Filter, FilterPattern, Literal, NumericOp, NumericRule, PatternNode, Rule,
    ScalarFilter,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while decoding a filter pattern.
///
/// `path` is the dotted attribute path of the offending node, e.g.
/// `dynamodb.Keys.pk`, or `<root>` for the pattern itself.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// The pattern (or a nested node) is not a JSON object where one is required.
    #[error("Pattern at {path} must be an object, found {found}")]
    NotAnObject {
        /// Offending path.
        path: String,
        /// JSON type found.
        found: &'static str,
    },
    /// An object node declares no keys.
    #[error("Pattern at {path} is an empty object")]
    EmptyObject {
        /// Offending path.
        path: String,
    },
    /// A leaf is a bare value instead of an array of alternatives.
    #[error("Filter at {path} must be an array or a typed container, found {found}")]
    InvalidLeaf {
        /// Offending path.
        path: String,
        /// JSON type found.
        found: &'static str,
    },
    /// A rule list has no alternatives.
    #[error("Filter at {path} has no alternatives")]
    EmptyRuleList {
        /// Offending path.
        path: String,
    },
    /// A rule object uses a key outside the grammar.
    #[error("Unknown rule '{key}' at {path}")]
    UnknownRule {
        /// Offending path.
        path: String,
        /// The unrecognized key.
        key: String,
    },
    /// A rule object has zero or several keys.
    #[error("Rule at {path} must have exactly one key, found [{}]", .keys.join(", "))]
    AmbiguousRule {
        /// Offending path.
        path: String,
        /// Keys present on the rule object.
        keys: Vec<String>,
    },
    /// A rule's argument has the wrong shape.
    #[error("Invalid '{rule}' rule at {path}: {message}")]
    InvalidRule {
        /// Offending path.
        path: String,
        /// Rule name.
        rule: &'static str,
        /// Explanation.
        message: String,
    },
    /// A numeric rule uses an operator outside `= < <= > >=`.
    #[error("Unknown numeric operator '{operator}' at {path}")]
    UnknownOperator {
        /// Offending path.
        path: String,
        /// The operator as written.
        operator: String,
    },
    /// A typed container holds values of the wrong type.
    #[error("Invalid {descriptor} filter at {path}: {message}")]
    InvalidScalarFilter {
        /// Offending path.
        path: String,
        /// Type descriptor (`S`, `N`, ...).
        descriptor: &'static str,
        /// Explanation.
        message: String,
    },
    /// The input is not valid JSON.
    #[error("Invalid pattern JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

const ROOT: &str = "<root>";

/// Decode a single filter pattern.
///
/// # Errors
///
/// Returns `PatternError` if the value is not a well-formed pattern.
pub fn parse_pattern(value: &Value) -> Result<FilterPattern, PatternError> {
    let Value::Object(map) = value else {
        return Err(PatternError::NotAnObject {
            path: ROOT.to_owned(),
            found: json_type(value),
        });
    };
    let root = parse_object(map, &Path::root())?;
    Ok(FilterPattern { root })
}

/// Decode a list of filter patterns.
///
/// A single object is accepted as a one-element list.
///
/// # Errors
///
/// Returns the first `PatternError` encountered.
pub fn parse_patterns(value: &Value) -> Result<Vec<FilterPattern>, PatternError> {
    match value {
        Value::Array(items) => items.iter().map(parse_pattern).collect(),
        other => parse_pattern(other).map(|p| vec![p]),
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Dotted path used in error messages.
#[derive(Debug, Clone)]
struct Path(Vec<String>);

impl Path {
    fn root() -> Self {
        Self(Vec::new())
    }

    fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_owned());
        Self(segments)
    }

    fn render(&self) -> String {
        if self.0.is_empty() {
            ROOT.to_owned()
        } else {
            self.0.join(".")
        }
    }
}

fn parse_object(
    map: &Map<String, Value>,
    path: &Path,
) -> Result<BTreeMap<String, PatternNode>, PatternError> {
    if map.is_empty() {
        return Err(PatternError::EmptyObject {
            path: path.render(),
        });
    }
    map.iter()
        .map(|(key, value)| {
            let child = path.child(key);
            parse_node(value, &child).map(|node| (key.clone(), node))
        })
        .collect()
}

fn parse_node(value: &Value, path: &Path) -> Result<PatternNode, PatternError> {
    match value {
        Value::Array(items) => parse_rules(items, path).map(|r| PatternNode::Leaf(Filter::Rules(r))),
        Value::Object(map) => {
            if let Some(filter) = parse_scalar_filter(map, path)? {
                return Ok(PatternNode::Leaf(Filter::Scalar(filter)));
            }
            parse_object(map, path).map(PatternNode::Object)
        }
        other => Err(PatternError::InvalidLeaf {
            path: path.render(),
            found: json_type(other),
        }),
    }
}

/// Recognize a typed container like `{"S": ["a", "b"]}` or `{"NULL": ""}`.
///
/// Returns `Ok(None)` when the object does not have container shape, in which
/// case it is a nested attribute map (an attribute may legitimately be named
/// `S`). A descriptor holding rule-shaped values (objects, arrays, `null`) is
/// such a map; a descriptor holding literals of the wrong type is an error.
fn parse_scalar_filter(
    map: &Map<String, Value>,
    path: &Path,
) -> Result<Option<ScalarFilter>, PatternError> {
    if map.len() != 1 {
        return Ok(None);
    }
    let Some((key, value)) = map.iter().next() else {
        return Ok(None);
    };
    let invalid = |descriptor: &'static str, message: String| PatternError::InvalidScalarFilter {
        path: path.render(),
        descriptor,
        message,
    };

    if key == "NULL" {
        return match value {
            Value::String(s) if s.is_empty() => Ok(Some(ScalarFilter::Null)),
            Value::Bool(true) => Ok(Some(ScalarFilter::Null)),
            Value::String(_) | Value::Bool(_) | Value::Number(_) => Err(invalid(
                "NULL",
                format!("expected \"\" or true, found {value}"),
            )),
            _ => Ok(None),
        };
    }

    let Value::Array(items) = value else {
        return Ok(None);
    };
    if items
        .iter()
        .any(|v| v.is_null() || v.is_array() || v.is_object())
    {
        return Ok(None);
    }
    let wrong_type = |descriptor: &'static str, expected: &str, accepts: fn(&Value) -> bool| {
        match items.iter().find(|v| !accepts(v)) {
            Some(v) => Err(invalid(
                descriptor,
                format!("expected {expected}, found {} {v}", json_type(v)),
            )),
            None => Ok(()),
        }
    };

    let filter = match key.as_str() {
        "S" => {
            wrong_type("S", "strings", Value::is_string)?;
            ScalarFilter::S(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect(),
            )
        }
        "N" => {
            wrong_type("N", "numbers", |v| v.is_number() || v.is_string())?;
            let numbers = items
                .iter()
                .map(|v| {
                    json_number(v).ok_or_else(|| invalid("N", format!("'{v}' is not a valid number")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            ScalarFilter::N(numbers)
        }
        "B" => {
            use base64::Engine;

            wrong_type("B", "base64 strings", Value::is_string)?;
            let decoded = items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| {
                    base64::engine::general_purpose::STANDARD
                        .decode(s)
                        .map(bytes::Bytes::from)
                        .map_err(|e| invalid("B", format!("'{s}' is not valid base64: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            ScalarFilter::B(decoded)
        }
        "BOOL" => {
            wrong_type("BOOL", "booleans", Value::is_boolean)?;
            ScalarFilter::Bool(items.iter().filter_map(Value::as_bool).collect())
        }
        _ => return Ok(None),
    };

    if items.is_empty() {
        return Err(invalid(filter.type_descriptor(), "no alternatives".to_owned()));
    }
    Ok(Some(filter))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn parse_rules(items: &[Value], path: &Path) -> Result<Vec<Rule>, PatternError> {
    if items.is_empty() {
        return Err(PatternError::EmptyRuleList {
            path: path.render(),
        });
    }
    items.iter().map(|item| parse_rule(item, path)).collect()
}

fn parse_rule(value: &Value, path: &Path) -> Result<Rule, PatternError> {
    match value {
        Value::Null => Ok(Rule::Null),
        Value::String(s) if s.is_empty() => Ok(Rule::Empty),
        Value::Object(map) => parse_rule_object(map, path),
        Value::Array(_) => Err(PatternError::InvalidRule {
            path: path.render(),
            rule: "literal",
            message: "nested arrays are not supported".to_owned(),
        }),
        literal => parse_literal(literal)
            .map(Rule::Equals)
            .ok_or_else(|| PatternError::InvalidRule {
                path: path.render(),
                rule: "literal",
                message: format!("unsupported literal {literal}"),
            }),
    }
}

fn parse_rule_object(map: &Map<String, Value>, path: &Path) -> Result<Rule, PatternError> {
    if map.len() != 1 {
        return Err(PatternError::AmbiguousRule {
            path: path.render(),
            keys: map.keys().cloned().collect(),
        });
    }
    let Some((key, arg)) = map.iter().next() else {
        return Err(PatternError::AmbiguousRule {
            path: path.render(),
            keys: Vec::new(),
        });
    };
    let invalid = |rule: &'static str, message: &str| PatternError::InvalidRule {
        path: path.render(),
        rule,
        message: message.to_owned(),
    };

    match key.as_str() {
        "anything-but" => {
            let literals = match arg {
                Value::Array(items) if !items.is_empty() => items
                    .iter()
                    .map(|v| {
                        parse_literal(v)
                            .ok_or_else(|| invalid("anything-but", "values must be strings, numbers or booleans"))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                Value::Array(_) => return Err(invalid("anything-but", "value list is empty")),
                single => vec![parse_literal(single).ok_or_else(|| {
                    invalid("anything-but", "value must be a literal or a list of literals")
                })?],
            };
            Ok(Rule::AnythingBut(literals))
        }
        "numeric" => parse_numeric(arg, path).map(Rule::Numeric),
        "exists" => arg
            .as_bool()
            .map(Rule::Exists)
            .ok_or_else(|| invalid("exists", "value must be a boolean")),
        "prefix" => arg
            .as_str()
            .map(|s| Rule::Prefix(s.to_owned()))
            .ok_or_else(|| invalid("prefix", "value must be a string")),
        other => Err(PatternError::UnknownRule {
            path: path.render(),
            key: other.to_owned(),
        }),
    }
}

fn parse_numeric(arg: &Value, path: &Path) -> Result<NumericRule, PatternError> {
    let Value::Array(items) = arg else {
        return Err(PatternError::InvalidRule {
            path: path.render(),
            rule: "numeric",
            message: "value must be an array".to_owned(),
        });
    };
    match items.as_slice() {
        [op, operand] => Ok(NumericRule::Single(parse_comparison(op, operand, path)?)),
        [op1, operand1, op2, operand2] => Ok(NumericRule::Range(
            parse_comparison(op1, operand1, path)?,
            parse_comparison(op2, operand2, path)?,
        )),
        _ => Err(PatternError::InvalidRule {
            path: path.render(),
            rule: "numeric",
            message: format!("expected 2 or 4 elements, found {}", items.len()),
        }),
    }
}

fn parse_comparison(op: &Value, operand: &Value, path: &Path) -> Result<Comparison, PatternError> {
    let Some(token) = op.as_str() else {
        return Err(PatternError::InvalidRule {
            path: path.render(),
            rule: "numeric",
            message: format!("operator must be a string, found {op}"),
        });
    };
    let op = NumericOp::from_token(token).ok_or_else(|| PatternError::UnknownOperator {
        path: path.render(),
        operator: token.to_owned(),
    })?;
    let operand = operand.as_f64().ok_or_else(|| PatternError::InvalidRule {
        path: path.render(),
        rule: "numeric",
        message: format!("operand must be a number, found {operand}"),
    })?;
    Ok(Comparison { op, operand })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_literal(value: &Value) -> Option<Literal> {
    match value {
        Value::String(s) => Some(Literal::String(s.clone())),
        Value::Number(n) => n.as_f64().map(Literal::Number),
        Value::Bool(b) => Some(Literal::Bool(*b)),
        _ => None,
    }
}

/// Number from a JSON number or a DynamoDB number string.
fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
