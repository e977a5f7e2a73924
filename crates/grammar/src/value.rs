//! Bind values
//!
//! Scalars that travel beside the compiled SQL text and are handed to the
//! driver for positional binding.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A value bound to exactly one placeholder in compiled SQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Uuid(uuid::Uuid),
    DateTime(chrono::DateTime<chrono::Utc>),
    Date(chrono::NaiveDate),
    Time(chrono::NaiveTime),
    Json(JsonValue),
}

impl BindValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, BindValue::Null)
    }

    /// Convert to JSON value, mainly for logging and driver adapters
    pub fn to_json(&self) -> JsonValue {
        match self {
            BindValue::Null => JsonValue::Null,
            BindValue::Bool(b) => JsonValue::Bool(*b),
            BindValue::Int32(i) => JsonValue::from(*i),
            BindValue::Int64(i) => JsonValue::from(*i),
            BindValue::Float32(f) => serde_json::Number::from_f64(*f as f64)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            BindValue::Float64(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            BindValue::String(s) => JsonValue::String(s.clone()),
            BindValue::Bytes(b) => {
                JsonValue::Array(b.iter().map(|&x| JsonValue::from(x)).collect())
            }
            BindValue::Uuid(u) => JsonValue::String(u.to_string()),
            BindValue::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
            BindValue::Date(d) => JsonValue::String(d.to_string()),
            BindValue::Time(t) => JsonValue::String(t.to_string()),
            BindValue::Json(j) => j.clone(),
        }
    }

    /// Create a bind value from a JSON value
    ///
    /// Integers that fit are narrowed to `Int32`; arrays and objects stay JSON.
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => BindValue::Null,
            JsonValue::Bool(b) => BindValue::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => BindValue::Int32(small),
                        Err(_) => BindValue::Int64(i),
                    }
                } else if let Some(f) = n.as_f64() {
                    BindValue::Float64(f)
                } else {
                    BindValue::Null
                }
            }
            JsonValue::String(s) => BindValue::String(s),
            other => BindValue::Json(other),
        }
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        BindValue::Bool(value)
    }
}

impl From<i32> for BindValue {
    fn from(value: i32) -> Self {
        BindValue::Int32(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Int64(value)
    }
}

impl From<f32> for BindValue {
    fn from(value: f32) -> Self {
        BindValue::Float32(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Float64(value)
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::String(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(value: Vec<u8>) -> Self {
        BindValue::Bytes(value)
    }
}

impl From<uuid::Uuid> for BindValue {
    fn from(value: uuid::Uuid) -> Self {
        BindValue::Uuid(value)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for BindValue {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        BindValue::DateTime(value)
    }
}

impl From<chrono::NaiveDate> for BindValue {
    fn from(value: chrono::NaiveDate) -> Self {
        BindValue::Date(value)
    }
}

impl From<chrono::NaiveTime> for BindValue {
    fn from(value: chrono::NaiveTime) -> Self {
        BindValue::Time(value)
    }
}

impl From<JsonValue> for BindValue {
    fn from(value: JsonValue) -> Self {
        BindValue::Json(value)
    }
}

impl<T> From<Option<T>> for BindValue
where
    T: Into<BindValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => BindValue::Null,
        }
    }
}
