//! Rule evaluators.
//!
//! Each evaluator compares one pattern alternative with a normalized event
//! value. Shape mismatches (a numeric rule on a string, a prefix rule on a
//! number) are plain non-matches so the remaining alternatives still get a
//! chance. Comparison is type-strict: `{"S": ["1"]}` never equals `{"N": "1"}`.

use super::normalize::{Normalized, Scalar};
use crate::pattern::{Comparison, Filter, Literal, NumericOp, NumericRule, Rule, ScalarFilter};

impl Filter {
    /// Returns `true` if any alternative matches `value`.
    #[must_use]
    pub fn matches(&self, value: &Normalized<'_>) -> bool {
        match self {
            Self::Scalar(filter) => filter.matches(value),
            Self::Rules(rules) => rules.iter().any(|rule| rule.matches(value)),
        }
    }
}

impl ScalarFilter {
    /// Typed equality against any of the listed alternatives.
    #[must_use]
    pub fn matches(&self, value: &Normalized<'_>) -> bool {
        match (self, value) {
            (Self::Null, Normalized::Null) => true,
            (Self::S(options), Normalized::Scalar(Scalar::String(s))) => {
                options.iter().any(|o| o == s)
            }
            (Self::N(options), Normalized::Scalar(Scalar::Number(n))) => {
                options.iter().any(|o| compare_f64(*n, *o, NumericOp::Eq))
            }
            (Self::B(options), Normalized::Scalar(Scalar::Binary(b))) => {
                options.iter().any(|o| o.as_ref() == *b)
            }
            (Self::Bool(options), Normalized::Scalar(Scalar::Bool(b))) => options.contains(b),
            _ => false,
        }
    }
}

impl Rule {
    /// Evaluate a single rule against a normalized value.
    #[must_use]
    pub fn matches(&self, value: &Normalized<'_>) -> bool {
        match self {
            Self::Null => matches!(value, Normalized::Null),
            Self::Empty => matches!(value, Normalized::Scalar(Scalar::String(""))),
            Self::Equals(literal) => match value {
                Normalized::Scalar(scalar) => literal.equals(scalar),
                _ => false,
            },
            Self::AnythingBut(literals) => match value {
                Normalized::Scalar(scalar) => literals.iter().all(|l| !l.equals(scalar)),
                Normalized::Null => true,
                Normalized::Absent | Normalized::Unsupported => false,
            },
            Self::Numeric(rule) => match value {
                Normalized::Scalar(Scalar::Number(n)) => rule.matches(*n),
                _ => false,
            },
            Self::Exists(present) => value.is_present() == *present,
            Self::Prefix(prefix) => match value {
                Normalized::Scalar(Scalar::String(s)) => s.starts_with(prefix.as_str()),
                _ => false,
            },
        }
    }
}

impl Literal {
    /// Value equality between an untyped literal and a normalized scalar.
    #[must_use]
    pub fn equals(&self, scalar: &Scalar<'_>) -> bool {
        match (self, scalar) {
            (Self::String(a), Scalar::String(b)) => a == b,
            (Self::Number(a), Scalar::Number(b)) => compare_f64(*b, *a, NumericOp::Eq),
            (Self::Bool(a), Scalar::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl NumericRule {
    /// Apply the comparison(s) to `value`; a range needs both bounds to hold.
    #[must_use]
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Self::Single(c) => c.holds(value),
            Self::Range(low, high) => low.holds(value) && high.holds(value),
        }
    }
}

impl Comparison {
    /// Returns `value <op> operand`.
    #[must_use]
    pub fn holds(&self, value: f64) -> bool {
        compare_f64(value, self.operand, self.op)
    }
}

/// Floating-point comparison for DynamoDB number values.
///
/// Equality is exact: `1e-20` and `3e-20` are different numbers.
#[allow(clippy::float_cmp)]
fn compare_f64(a: f64, b: f64, op: NumericOp) -> bool {
    match op {
        NumericOp::Eq => a == b,
        NumericOp::Lt => a < b,
        NumericOp::Le => a <= b,
        NumericOp::Gt => a > b,
        NumericOp::Ge => a >= b,
    }
}
