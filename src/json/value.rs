//! Tagged claim values and typed conversions
//!
//! Every header and payload entry is a [`ClaimValue`]. Reading a claim as a
//! concrete Rust type goes through [`FromClaimValue`], which defines the
//! accepted coercions once:
//!
//! - integers widen to floats; floats with no fractional part narrow to integers
//! - numeric and boolean strings parse into numbers and booleans
//! - numbers and booleans format into strings
//! - a scalar reads as a one-element `Vec`
//!
//! Anything else is a conversion failure, never a silent default.

use std::collections::BTreeMap;

/// Header or payload contents: claim name to value
pub type ClaimMap = BTreeMap<String, ClaimValue>;

/// A JSON-representable claim value
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    /// Integral number; unsigned values above `i64::MAX` are stored as `Float`
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<ClaimValue>),
    Object(ClaimMap),
}

impl ClaimValue {
    /// Name of the variant, used in conversion errors
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimValue::Null => "null",
            ClaimValue::Bool(_) => "boolean",
            ClaimValue::Int(_) => "integer",
            ClaimValue::Float(_) => "number",
            ClaimValue::String(_) => "string",
            ClaimValue::Array(_) => "array",
            ClaimValue::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ClaimMap> {
        match self {
            ClaimValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ClaimValue::Null)
    }

    /// Read as a NumericDate (seconds since the epoch)
    ///
    /// Fractional seconds are truncated toward negative infinity.
    pub fn as_numeric_date(&self) -> Option<i64> {
        match self {
            ClaimValue::Int(n) => Some(*n),
            ClaimValue::Float(f) if f.is_finite() => {
                let floored = f.floor();
                if floored >= i64::MIN as f64 && floored <= i64::MAX as f64 {
                    Some(floored as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Strings contained in a string or array-of-strings value
    ///
    /// Used for `aud`, which RFC 7519 allows in either shape.
    pub fn string_values(&self) -> Vec<&str> {
        match self {
            ClaimValue::String(s) => vec![s.as_str()],
            ClaimValue::Array(items) => items.iter().filter_map(ClaimValue::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<&String> for ClaimValue {
    fn from(value: &String) -> Self {
        ClaimValue::String(value.clone())
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Int(value.into())
    }
}

impl From<u32> for ClaimValue {
    fn from(value: u32) -> Self {
        ClaimValue::Int(value.into())
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Int(value)
    }
}

impl From<u64> for ClaimValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => ClaimValue::Int(n),
            Err(_) => ClaimValue::Float(value as f64),
        }
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

impl From<ClaimMap> for ClaimValue {
    fn from(value: ClaimMap) -> Self {
        ClaimValue::Object(value)
    }
}

impl<T: Into<ClaimValue>> From<Vec<T>> for ClaimValue {
    fn from(value: Vec<T>) -> Self {
        ClaimValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ClaimValue>> From<Option<T>> for ClaimValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ClaimValue::Null, Into::into)
    }
}

// ============================================================================
// Typed extraction
// ============================================================================

/// Fallible conversion from a claim value to a Rust type
pub trait FromClaimValue: Sized {
    /// Type name reported when the conversion fails
    const EXPECTED: &'static str;

    fn from_claim_value(value: &ClaimValue) -> Option<Self>;
}

impl FromClaimValue for ClaimValue {
    const EXPECTED: &'static str = "any value";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromClaimValue for String {
    const EXPECTED: &'static str = "string";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        match value {
            ClaimValue::String(s) => Some(s.clone()),
            ClaimValue::Bool(b) => Some(b.to_string()),
            ClaimValue::Int(n) => Some(n.to_string()),
            ClaimValue::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

impl FromClaimValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        match value {
            ClaimValue::Int(n) => Some(*n),
            ClaimValue::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            ClaimValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromClaimValue for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        match value {
            ClaimValue::Int(n) => u64::try_from(*n).ok(),
            ClaimValue::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64 => {
                Some(*f as u64)
            }
            ClaimValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromClaimValue for i32 {
    const EXPECTED: &'static str = "32-bit integer";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        i64::from_claim_value(value).and_then(|n| i32::try_from(n).ok())
    }
}

impl FromClaimValue for u32 {
    const EXPECTED: &'static str = "32-bit unsigned integer";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        i64::from_claim_value(value).and_then(|n| u32::try_from(n).ok())
    }
}

impl FromClaimValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        match value {
            ClaimValue::Float(f) => Some(*f),
            ClaimValue::Int(n) => Some(*n as f64),
            ClaimValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromClaimValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        match value {
            ClaimValue::Bool(b) => Some(*b),
            ClaimValue::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            ClaimValue::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl FromClaimValue for ClaimMap {
    const EXPECTED: &'static str = "object";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl<T: FromClaimValue> FromClaimValue for Vec<T> {
    const EXPECTED: &'static str = "array";

    fn from_claim_value(value: &ClaimValue) -> Option<Self> {
        match value {
            ClaimValue::Array(items) => items.iter().map(T::from_claim_value).collect(),
            ClaimValue::Null | ClaimValue::Object(_) => None,
            scalar => T::from_claim_value(scalar).map(|item| vec![item]),
        }
    }
}
