//! JSON provider contract and bundled implementations
//!
//! The codec never touches a JSON library directly. It goes through a
//! [`JsonProvider`] handed to it at construction, so the JSON backend is a
//! dependency of each codec/builder/parser instance rather than process-wide
//! state.

use crate::error::{Error, Result};
use crate::json::value::{ClaimMap, ClaimValue};
use crate::limits::MAX_JSON_DEPTH;

/// Serializes claim values to JSON text and back
///
/// Implementations must round-trip every JSON shape: null, booleans,
/// numbers, strings, arrays and objects.
pub trait JsonProvider: Send + Sync {
    /// Serialize a value to compact JSON text
    fn serialize(&self, value: &ClaimValue) -> Result<String>;

    /// Parse JSON text into a value
    fn deserialize(&self, text: &str) -> Result<ClaimValue>;

    /// Serialize a claim map as a JSON object
    fn serialize_object(&self, map: &ClaimMap) -> Result<String> {
        self.serialize(&ClaimValue::Object(map.clone()))
    }
}

/// Default provider backed by `miniserde`
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniserdeJson;

impl MiniserdeJson {
    fn to_value(value: &ClaimValue) -> miniserde::json::Value {
        use miniserde::json::{Array, Number, Object, Value};

        match value {
            ClaimValue::Null => Value::Null,
            ClaimValue::Bool(b) => Value::Bool(*b),
            ClaimValue::Int(n) if *n >= 0 => Value::Number(Number::U64(*n as u64)),
            ClaimValue::Int(n) => Value::Number(Number::I64(*n)),
            ClaimValue::Float(f) if f.is_finite() => Value::Number(Number::F64(*f)),
            // JSON has no representation for NaN or infinities
            ClaimValue::Float(_) => Value::Null,
            ClaimValue::String(s) => Value::String(s.clone()),
            ClaimValue::Array(items) => {
                let mut array = Array::new();
                for item in items {
                    array.push(Self::to_value(item));
                }
                Value::Array(array)
            }
            ClaimValue::Object(map) => {
                let mut object = Object::new();
                for (key, item) in map {
                    object.insert(key.clone(), Self::to_value(item));
                }
                Value::Object(object)
            }
        }
    }

    /// Convert a parsed value, `depth` being the number of enclosing containers
    fn from_value(value: miniserde::json::Value, depth: usize) -> Result<ClaimValue> {
        use miniserde::json::{Number, Value};

        let nested = depth + 1;
        if matches!(value, Value::Array(_) | Value::Object(_)) && nested > MAX_JSON_DEPTH {
            return Err(Error::FormatInvalidJson(format!(
                "nesting deeper than {MAX_JSON_DEPTH} levels"
            )));
        }

        Ok(match value {
            Value::Null => ClaimValue::Null,
            Value::Bool(b) => ClaimValue::Bool(b),
            Value::Number(Number::U64(n)) => ClaimValue::from(n),
            Value::Number(Number::I64(n)) => ClaimValue::Int(n),
            Value::Number(Number::F64(f)) => ClaimValue::Float(f),
            Value::String(s) => ClaimValue::String(s),
            Value::Array(mut items) => ClaimValue::Array(
                std::mem::take(&mut *items)
                    .into_iter()
                    .map(|item| Self::from_value(item, nested))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(mut object) => ClaimValue::Object(
                std::mem::take(&mut *object)
                    .into_iter()
                    .map(|(key, item)| Self::from_value(item, nested).map(|value| (key, value)))
                    .collect::<Result<_>>()?,
            ),
        })
    }
}

impl JsonProvider for MiniserdeJson {
    fn serialize(&self, value: &ClaimValue) -> Result<String> {
        Ok(miniserde::json::to_string(&Self::to_value(value)))
    }

    fn deserialize(&self, text: &str) -> Result<ClaimValue> {
        let value: miniserde::json::Value = miniserde::json::from_str(text)
            .map_err(|e| Error::FormatInvalidJson(e.to_string()))?;
        Self::from_value(value, 0)
    }
}

/// Provider backed by `serde_json`
#[cfg(feature = "serde-json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJson;

#[cfg(feature = "serde-json")]
impl SerdeJson {
    fn to_value(value: &ClaimValue) -> serde_json::Value {
        use serde_json::Value;

        match value {
            ClaimValue::Null => Value::Null,
            ClaimValue::Bool(b) => Value::Bool(*b),
            ClaimValue::Int(n) => Value::from(*n),
            ClaimValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ClaimValue::String(s) => Value::String(s.clone()),
            ClaimValue::Array(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            ClaimValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), Self::to_value(item)))
                    .collect(),
            ),
        }
    }

    fn from_value(value: serde_json::Value) -> ClaimValue {
        use serde_json::Value;

        match value {
            Value::Null => ClaimValue::Null,
            Value::Bool(b) => ClaimValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ClaimValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ClaimValue::from(u)
                } else {
                    ClaimValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ClaimValue::String(s),
            Value::Array(items) => {
                ClaimValue::Array(items.into_iter().map(Self::from_value).collect())
            }
            Value::Object(object) => ClaimValue::Object(
                object
                    .into_iter()
                    .map(|(key, item)| (key, Self::from_value(item)))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "serde-json")]
impl JsonProvider for SerdeJson {
    fn serialize(&self, value: &ClaimValue) -> Result<String> {
        serde_json::to_string(&Self::to_value(value))
            .map_err(|e| Error::JsonSerialization(e.to_string()))
    }

    fn deserialize(&self, text: &str) -> Result<ClaimValue> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| Error::FormatInvalidJson(e.to_string()))?;
        Ok(Self::from_value(value))
    }
}
