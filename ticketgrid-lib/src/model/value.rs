//! Value enum for dynamic field values

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::prelude::ToPrimitive;

/// A dynamic value that can hold any ticket service field type.
///
/// This enum represents all values the backend serializes into record fields.
/// It is used in [`Record`](super::Record) to store field values dynamically.
///
/// # Type Mapping
///
/// | Transport JSON | Rust Variant |
/// |----------------|--------------|
/// | null | `Null` |
/// | boolean | `Bool` |
/// | integer | `Int` |
/// | float | `Float` |
/// | `{"parsedValue": ...}` | `Decimal` |
/// | string | `String` |
/// | object | `Record` |
/// | array | `List` |
///
/// The `parsedValue` wrapper is how the backend serializes arbitrary-precision
/// quantities; it is unwrapped into a [`Decimal`] at deserialization time so
/// every consumer sees one canonical numeric form.
///
/// # Example
///
/// ```
/// use ticketgrid_lib::model::Value;
///
/// let name = Value::from("VIP");
/// let price = Value::from(199.5f64);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Arbitrary precision decimal (from a `parsedValue` wrapper).
    Decimal(Decimal),
    /// String value.
    String(String),
    /// Nested record (coordinates, person, event, venue).
    Record(Box<super::Record>),
    /// Array of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Record(_) => "record",
            Value::List(_) => "list",
        }
    }

    /// Returns the numeric form of this value, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Converts an arbitrary JSON value into a `Value`.
    ///
    /// Objects carrying a `parsedValue` member are unwrapped into `Decimal`;
    /// all other objects become nested records.
    pub fn from_json(raw: serde_json::Value) -> Value {
        match raw {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(mut map) => {
                if let Some(parsed) = map.remove("parsedValue") {
                    return unwrap_parsed_value(parsed);
                }
                let mut record = super::Record::new();
                for (key, value) in map {
                    record.insert(key, Value::from_json(value));
                }
                Value::Record(Box::new(record))
            }
        }
    }
}

/// Converts the inner `parsedValue` of a big-decimal wrapper.
fn unwrap_parsed_value(parsed: serde_json::Value) -> Value {
    match parsed {
        serde_json::Value::String(s) => match s.parse::<Decimal>() {
            Ok(d) => Value::Decimal(d),
            Err(_) => Value::String(s),
        },
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Decimal(Decimal::from(i))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                match Decimal::from_f64(f) {
                    Some(d) => Value::Decimal(d),
                    None => Value::Float(f),
                }
            }
        }
        other => Value::from_json(other),
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<super::Record> for Value {
    fn from(v: super::Record) -> Self {
        Value::Record(Box::new(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}
