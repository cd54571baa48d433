//! Scalar attribute values carried from vector features into output tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Non-null attributes of a feature, keyed by field name.
///
/// Null fields are simply absent, which keeps the "first non-null" reduction
/// a plain map lookup.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A non-null scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// Convert a JSON property value. Returns `None` for `null`.
    ///
    /// Arrays and objects are kept as their compact JSON text.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Number)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Some(Self::Text(value.to_string())),
        }
    }

    /// Convert back to a JSON value for vector export.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// Numeric view, used by attribute filters.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Integer(i) => Some(*i as f64),
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Normalized join-key text.
    ///
    /// Integral numbers lose their fractional part (`12.0` and `12` are the
    /// same zone), text is trimmed, and booleans or blank text are unusable.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Bool(_) => None,
            Self::Integer(i) => Some(i.to_string()),
            Self::Number(n) if !n.is_finite() => None,
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                Some((*n as i64).to_string())
            }
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Collect the non-null scalar properties of a JSON object.
#[must_use]
pub fn attributes_from_json(properties: &serde_json::Map<String, Value>) -> Attributes {
    properties
        .iter()
        .filter_map(|(key, value)| AttrValue::from_json(value).map(|v| (key.clone(), v)))
        .collect()
}
