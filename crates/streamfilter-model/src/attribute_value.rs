//! Typed DynamoDB wire containers.
//!
//! Each value is a single-key object keyed by its type descriptor, e.g.
//! `{"S": "hello"}` or `{"N": "42"}`. The derive below maps that directly onto
//! serde's externally tagged enum representation; the field codecs in this
//! module only deal with the lenient spellings stream records arrive in.
//!
//! Local emulators do not always follow the AWS spelling: numbers sometimes
//! arrive as bare JSON numbers and `NULL` sometimes carries `""`. Both are
//! accepted on input; output always uses the AWS spelling.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Every type descriptor DynamoDB uses as a wire-container key.
pub const TYPE_DESCRIPTORS: &[&str] = &["S", "N", "B", "SS", "NS", "BS", "BOOL", "NULL", "L", "M"];

/// A DynamoDB attribute value as carried in stream images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// `{"S": "..."}`
    #[serde(rename = "S")]
    S(String),
    /// `{"N": "..."}`, kept in its decimal text form.
    #[serde(rename = "N", deserialize_with = "wire_number::one")]
    N(String),
    /// `{"B": "<base64>"}`, decoded.
    #[serde(rename = "B", with = "base64_bytes")]
    B(Bytes),
    /// `{"SS": [...]}`
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// `{"NS": [...]}`
    #[serde(rename = "NS", deserialize_with = "wire_number::many")]
    Ns(Vec<String>),
    /// `{"BS": [...]}`, decoded.
    #[serde(rename = "BS", with = "base64_bytes::many")]
    Bs(Vec<Bytes>),
    /// `{"BOOL": bool}`
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// `{"NULL": true}`
    #[serde(rename = "NULL", deserialize_with = "null_marker")]
    Null(bool),
    /// `{"L": [...]}`
    #[serde(rename = "L")]
    L(Vec<AttributeValue>),
    /// `{"M": {...}}`
    #[serde(rename = "M")]
    M(HashMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Numeric value of an `N` value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        if let Self::N(n) = self {
            n.trim().parse().ok()
        } else {
            None
        }
    }

    /// The wire key of this value.
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::L(_) => "L",
            Self::M(_) => "M",
        }
    }

    /// Returns `true` if `value` has the JSON shape the `descriptor` container expects.
    ///
    /// This is a shape check only; the content (base64, number syntax) is
    /// validated when the container is decoded.
    #[must_use]
    pub fn accepts_json(descriptor: &str, value: &serde_json::Value) -> bool {
        use serde_json::Value;

        match descriptor {
            "S" | "B" => value.is_string(),
            "N" => value.is_string() || value.is_number(),
            "BOOL" => value.is_boolean(),
            "NULL" => matches!(value, Value::Bool(_)) || value.as_str() == Some(""),
            "SS" | "NS" | "BS" | "L" => value.is_array(),
            "M" => value.is_object(),
            _ => false,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.type_descriptor();
        match self {
            Self::S(s) => write!(f, "{tag}:{s:?}"),
            Self::N(n) => write!(f, "{tag}:{n}"),
            Self::Bool(b) | Self::Null(b) => write!(f, "{tag}:{b}"),
            Self::B(b) => write!(f, "{tag}:<{} bytes>", b.len()),
            Self::Ss(v) | Self::Ns(v) => write!(f, "{tag}:<{} members>", v.len()),
            Self::Bs(v) => write!(f, "{tag}:<{} members>", v.len()),
            Self::L(v) => write!(f, "{tag}:<{} items>", v.len()),
            Self::M(m) => write!(f, "{tag}:<{} keys>", m.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// Field codecs
// ---------------------------------------------------------------------------

/// `N` / `NS` members: a decimal string, or a bare JSON number on input.
mod wire_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    fn checked<E: serde::de::Error>(raw: Raw) -> Result<String, E> {
        let text = match raw {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(text),
            _ => Err(E::custom(format!("'{text}' is not a valid number"))),
        }
    }

    pub(super) fn one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        checked(Raw::deserialize(deserializer)?)
    }

    pub(super) fn many<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        Vec::<Raw>::deserialize(deserializer)?
            .into_iter()
            .map(checked::<D::Error>)
            .collect()
    }
}

/// `B` / `BS` members: standard base64 on the wire.
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }

    pub(super) mod many {
        use super::{Bytes, STANDARD};
        use base64::Engine;
        use serde::{Deserialize, Deserializer, Serializer};

        pub(in super::super) fn serialize<S: Serializer>(
            members: &[Bytes],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(members.iter().map(|b| STANDARD.encode(b)))
        }

        pub(in super::super) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<Bytes>, D::Error> {
            Vec::<String>::deserialize(deserializer)?
                .iter()
                .map(|text| STANDARD.decode(text.as_bytes()).map(Bytes::from))
                .collect::<Result<_, _>>()
                .map_err(serde::de::Error::custom)
        }
    }
}

/// `NULL` marker: `true` per AWS, `""` from some emulators.
fn null_marker<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Flag(flag) => Ok(flag),
        Raw::Text(text) if text.is_empty() => Ok(true),
        Raw::Text(text) => Err(serde::de::Error::custom(format!(
            "NULL must be true or an empty string, got '{text}'"
        ))),
    }
}
