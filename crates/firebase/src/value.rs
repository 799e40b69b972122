//! Firestore REST value codec.
//!
//! The Firestore v1 REST API wraps every field in a typed envelope
//! (`{"stringValue": "x"}`, `{"integerValue": "3"}`, ...). The rest of the
//! workspace works with plain `serde_json::Value`s; this module converts
//! between the two shapes.
//!
//! Integer values travel as strings on the wire (int64 does not fit JSON
//! numbers losslessly). Conversions here are lossy only in one documented
//! way: Firestore types with no JSON counterpart (bytes, geo points,
//! references) come back as their raw envelope so nothing is silently
//! dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// A Firestore field value in wire form.
///
/// Externally tagged serde representation matches the REST envelope
/// one-to-one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[serde(rename = "nullValue")]
    Null(serde_json::Value),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    #[serde(rename = "integerValue")]
    Integer(String),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "timestampValue")]
    Timestamp(String),
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "mapValue")]
    Map(MapValue),
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
    /// Anything we do not model (bytes, references, geo points).
    #[serde(untagged)]
    Other(serde_json::Value),
}

/// Wire form of a map value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

/// Wire form of an array value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

impl Value {
    /// Unwrap the envelope into plain JSON.
    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Null(_) => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(b),
            Self::Integer(s) => s
                .parse::<i64>()
                .map_or(serde_json::Value::String(s), |n| json!(n)),
            Self::Double(f) => json!(f),
            Self::Timestamp(s) | Self::String(s) => serde_json::Value::String(s),
            Self::Map(map) => serde_json::Value::Object(
                map.fields
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
            Self::Array(array) => {
                serde_json::Value::Array(array.values.into_iter().map(Value::into_json).collect())
            }
            Self::Other(raw) => raw,
        }
    }

    /// Wrap plain JSON into the envelope.
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null(serde_json::Value::Null),
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => n.as_i64().map_or_else(
                || Self::Double(n.as_f64().unwrap_or(0.0)),
                |i| Self::Integer(i.to_string()),
            ),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(values) => Self::Array(ArrayValue {
                values: values.into_iter().map(Self::from_json).collect(),
            }),
            serde_json::Value::Object(map) => Self::Map(MapValue {
                fields: map
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            }),
        }
    }
}

/// Convert a whole fields map from wire form to plain JSON.
#[must_use]
pub fn fields_to_json(fields: BTreeMap<String, Value>) -> serde_json::Map<String, serde_json::Value> {
    fields
        .into_iter()
        .map(|(k, v)| (k, v.into_json()))
        .collect()
}

/// Convert a plain JSON object to a wire-form fields map.
#[must_use]
pub fn fields_from_json(object: serde_json::Map<String, serde_json::Value>) -> BTreeMap<String, Value> {
    object
        .into_iter()
        .map(|(k, v)| (k, Value::from_json(v)))
        .collect()
}
