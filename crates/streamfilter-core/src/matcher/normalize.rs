//! Event-side value normalization.
//!
//! Typed wire containers are unwrapped into comparable primitives before any
//! rule runs; rules never look at raw containers. NULL and absence are kept
//! apart: a record that says `{"NULL": true}` is not the same as a record that
//! omits the attribute.

use streamfilter_model::{AttributeValue, EventNode};

/// A comparable primitive taken from a change record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// `{"S": ..}` or a plain JSON string.
    String(&'a str),
    /// `{"N": ..}` or a plain JSON number.
    Number(f64),
    /// `{"B": ..}`, decoded.
    Binary(&'a [u8]),
    /// `{"BOOL": ..}` or a plain JSON boolean.
    Bool(bool),
}

/// Result of normalizing one event position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized<'a> {
    /// The attribute is not in the record.
    Absent,
    /// `{"NULL": true}` or JSON `null`.
    Null,
    /// A scalar rules can compare against.
    Scalar(Scalar<'a>),
    /// Present, but a collection or nested map; no scalar rule applies.
    Unsupported,
}

impl Normalized<'_> {
    /// Returns `true` for anything but [`Normalized::Absent`].
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// Normalize the event value found at a pattern leaf.
#[must_use]
pub fn normalize(node: Option<&EventNode>) -> Normalized<'_> {
    let Some(node) = node else {
        return Normalized::Absent;
    };
    match node {
        EventNode::Null => Normalized::Null,
        EventNode::Bool(b) => Normalized::Scalar(Scalar::Bool(*b)),
        EventNode::Number(n) => n
            .as_f64()
            .map_or(Normalized::Unsupported, |n| Normalized::Scalar(Scalar::Number(n))),
        EventNode::String(s) => Normalized::Scalar(Scalar::String(s)),
        EventNode::Attribute(av) => normalize_attribute(av),
        EventNode::List(_) | EventNode::Object(_) => Normalized::Unsupported,
    }
}

fn normalize_attribute(av: &AttributeValue) -> Normalized<'_> {
    match av {
        AttributeValue::S(s) => Normalized::Scalar(Scalar::String(s)),
        AttributeValue::N(_) => av
            .as_f64()
            .map_or(Normalized::Unsupported, |n| Normalized::Scalar(Scalar::Number(n))),
        AttributeValue::B(b) => Normalized::Scalar(Scalar::Binary(b)),
        AttributeValue::Bool(b) => Normalized::Scalar(Scalar::Bool(*b)),
        AttributeValue::Null(true) => Normalized::Null,
        AttributeValue::Null(false)
        | AttributeValue::Ss(_)
        | AttributeValue::Ns(_)
        | AttributeValue::Bs(_)
        | AttributeValue::L(_)
        | AttributeValue::M(_) => Normalized::Unsupported,
    }
}
