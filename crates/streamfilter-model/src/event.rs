//! Change-record trees.
//!
//! A DynamoDB stream record mixes plain JSON (`eventName`, `SequenceNumber`)
//! with typed wire containers (`dynamodb.NewImage.<attr>`). [`EventNode`]
//! models both in one recursive type so a filter pattern can be walked against
//! any part of the record without knowing its schema.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::attribute_value::{AttributeValue, TYPE_DESCRIPTORS};

/// One node of a change record.
#[derive(Debug, Clone, PartialEq)]
pub enum EventNode {
    /// JSON `null`.
    Null,
    /// Plain JSON boolean.
    Bool(bool),
    /// Plain JSON number.
    Number(serde_json::Number),
    /// Plain JSON string, e.g. `eventName`.
    String(String),
    /// Plain JSON array.
    List(Vec<EventNode>),
    /// A typed DynamoDB wire container such as `{"S": "abc"}`.
    Attribute(AttributeValue),
    /// A nested attribute map.
    Object(BTreeMap<String, EventNode>),
}

impl EventNode {
    /// Decode a JSON value into an event tree.
    ///
    /// A single-key object is read as a typed wire container only when its key
    /// is a DynamoDB type descriptor and its value has the matching JSON shape;
    /// otherwise it is an ordinary nested object. So an item attribute that
    /// happens to be named `S` and holds a map is still walked as a map.
    ///
    /// # Errors
    ///
    /// Returns an error if a recognized wire container has invalid content,
    /// e.g. non-base64 binary or a non-numeric `N`.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(Self::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => {
                if is_wire_container(&map) {
                    Self::Attribute(serde_json::from_value(Value::Object(map))?)
                } else {
                    Self::Object(
                        map.into_iter()
                            .map(|(k, v)| Self::from_json(v).map(|node| (k, node)))
                            .collect::<Result<_, _>>()?,
                    )
                }
            }
        })
    }

    /// Returns the child map if this is an `Object` node.
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, EventNode>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a direct child of an `Object` node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EventNode> {
        self.as_object()?.get(key)
    }

    /// Walk a dotted path such as `dynamodb.Keys.pk`.
    #[must_use]
    pub fn pointer(&self, path: &str) -> Option<&EventNode> {
        path.split('.').try_fold(self, |node, key| node.get(key))
    }

    /// Returns the typed attribute if this is an `Attribute` node.
    #[must_use]
    pub fn as_attribute(&self) -> Option<&AttributeValue> {
        match self {
            Self::Attribute(av) => Some(av),
            _ => None,
        }
    }

    /// Returns the string if this is a plain `String` node.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

fn is_wire_container(map: &serde_json::Map<String, Value>) -> bool {
    if map.len() != 1 {
        return false;
    }
    map.iter().next().is_some_and(|(key, value)| {
        TYPE_DESCRIPTORS.contains(&key.as_str()) && AttributeValue::accepts_json(key, value)
    })
}

impl fmt::Display for EventNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => write!(f, "[{} items]", items.len()),
            Self::Attribute(av) => write!(f, "{av}"),
            Self::Object(map) => write!(f, "{{{} keys}}", map.len()),
        }
    }
}

impl Serialize for EventNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Attribute(av) => av.serialize(serializer),
            Self::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for EventNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(D::Error::custom)
    }
}
