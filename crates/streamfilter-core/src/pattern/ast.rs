//! AST types for filter patterns.
//!
//! A filter pattern is a tree: interior nodes are attribute maps whose
//! declared keys are AND'd, leaves are [`Filter`]s whose alternatives are OR'd.
//! The tree is produced by the parser and consumed by the matcher.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;

/// A complete filter pattern, rooted at the change record.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPattern {
    /// Top-level constraints, normally `eventName` and `dynamodb`.
    pub root: BTreeMap<String, PatternNode>,
}

/// One node of a pattern tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternNode {
    /// Leaf constraint on a single attribute.
    Leaf(Filter),
    /// Nested attribute map; every declared key must match.
    Object(BTreeMap<String, PatternNode>),
}

/// Constraint on a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Direct typed equality, e.g. `{"S": ["FOO", "BAR"]}`.
    Scalar(ScalarFilter),
    /// Rule list, e.g. `[{"prefix": "FO"}, null]`. Any rule may match.
    Rules(Vec<Rule>),
}

/// Typed equality alternatives.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarFilter {
    /// `{"S": [...]}`.
    S(Vec<String>),
    /// `{"N": [...]}`.
    N(Vec<f64>),
    /// `{"B": [...]}`, base64-decoded.
    B(Vec<Bytes>),
    /// `{"BOOL": [...]}`.
    Bool(Vec<bool>),
    /// `{"NULL": ""}`.
    Null,
}

impl ScalarFilter {
    /// Returns the DynamoDB type descriptor this filter applies to.
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Bool(_) => "BOOL",
            Self::Null => "NULL",
        }
    }
}

/// A single rule inside a rule list.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `null`: matches a NULL-typed value.
    Null,
    /// `""`: matches the empty string.
    Empty,
    /// A bare literal, e.g. `"INSERT"` in `"eventName": ["INSERT"]`.
    Equals(Literal),
    /// `{"anything-but": [...]}`: the value must differ from every literal.
    AnythingBut(Vec<Literal>),
    /// `{"numeric": [...]}`.
    Numeric(NumericRule),
    /// `{"exists": bool}`.
    Exists(bool),
    /// `{"prefix": "..."}`.
    Prefix(String),
}

/// An untyped literal appearing in a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String literal.
    String(String),
    /// Number literal.
    Number(f64),
    /// Boolean literal.
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Numeric comparison: one bound, or two bounds that must both hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericRule {
    /// `[op, operand]`.
    Single(Comparison),
    /// `[op1, operand1, op2, operand2]`.
    Range(Comparison, Comparison),
}

/// One `(operator, operand)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Comparison operator.
    pub op: NumericOp,
    /// Right-hand side.
    pub operand: f64,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.operand)
    }
}

/// Numeric comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    /// Equal (`=`).
    Eq,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

impl NumericOp {
    /// Parse an operator token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Eq),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }
}

impl fmt::Display for NumericOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}
