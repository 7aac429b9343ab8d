//! Custom serialization for Record.
//!
//! ## Read Format (Deserialization)
//!
//! Responses arrive as plain JSON objects. Every member is converted through
//! [`Value::from_json`]: nested objects become nested records, and
//! `{"parsedValue": ...}` big-decimal wrappers collapse into `Value::Decimal`.
//! An integer `id` member is mirrored into `Record::id`.
//!
//! ## Write Format (Serialization)
//!
//! Records serialize back to plain JSON objects for create/update/import.
//! Null fields are skipped; the backend treats absent and null the same.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;

use super::Record;
use super::Value;

// =============================================================================
// Serialization (for writes)
// =============================================================================

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let count = self.fields.values().filter(|v| !v.is_null()).count();
        let mut map = serializer.serialize_map(Some(count))?;
        for (key, value) in &self.fields {
            if value.is_null() {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Decimal(d) => Serialize::serialize(d, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Record(r) => r.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

// =============================================================================
// Deserialization (from reads)
// =============================================================================

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a ticket record")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut record = Record::new();
        while let Some(key) = map.next_key::<String>()? {
            let raw: serde_json::Value = map.next_value()?;
            record.insert(key, Value::from_json(raw));
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from_json(raw))
    }
}
