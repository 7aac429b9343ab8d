//! Dynamic ticket record

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::Value;
use crate::error::FieldError;

/// A dynamic record from the ticket service.
///
/// Records hold field values as a `HashMap<String, Value>`, allowing dynamic
/// access to any field, including nested entities (coordinates, person, event,
/// venue). Typed getter methods provide safe access with proper error
/// handling; [`get_path`](Record::get_path) resolves dotted paths and treats
/// any missing or mismatched segment as an absent value rather than an error.
///
/// # Example
///
/// ```
/// use ticketgrid_lib::model::Record;
///
/// let record = Record::new()
///     .set("name", "Standard")
///     .set("price", 120.0f64);
///
/// assert_eq!(record.get_string("name").unwrap(), Some("Standard"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The record identifier, when the backend assigned one.
    pub(crate) id: Option<i64>,

    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self {
            id: None,
            fields: HashMap::new(),
        }
    }

    /// Creates a new record with the given ID.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            fields: HashMap::from([("id".to_string(), Value::Int(id))]),
        }
    }

    /// Returns the record ID, if set.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Sets the record ID.
    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
        self.fields.insert("id".to_string(), Value::Int(id));
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Resolves a dotted path like `"person.location.x"`.
    ///
    /// Returns `None` when any segment is missing or a non-record value is
    /// traversed; it never panics, so accessors built on top of it stay total.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            match current {
                Value::Record(nested) => current = nested.fields.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        if field == "id"
            && let Value::Int(id) = value
        {
            self.id = Some(id);
        }
        self.fields.insert(field, value);
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if the field is missing or the wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "string",
                other.type_name(),
            )),
        }
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    /// Gets an i64 field value.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets an f64 field value, widening from integers and decimals.
    pub fn get_float(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(value) => match value.as_f64() {
                Some(n) => Ok(Some(n)),
                None => Err(FieldError::type_mismatch(
                    field,
                    "float",
                    value.type_name(),
                )),
            },
        }
    }

    /// Gets a Decimal field value.
    pub fn get_decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Decimal(d)) => Ok(Some(*d)),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "decimal",
                other.type_name(),
            )),
        }
    }

    /// Gets a nested Record field value.
    pub fn get_record(&self, field: &str) -> Result<Option<&Record>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Record(r)) => Ok(Some(r.as_ref())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "record",
                other.type_name(),
            )),
        }
    }

    /// Gets a list field value.
    pub fn get_list(&self, field: &str) -> Result<Option<&Vec<Value>>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::List(items)) => Ok(Some(items)),
            Some(other) => Err(FieldError::type_mismatch(field, "list", other.type_name())),
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let record = Record::new()
            .set("name", "Standard")
            .set("number", 3i64)
            .set("comment", Value::Null);

        assert_eq!(record.get_string("name").unwrap(), Some("Standard"));
        assert_eq!(record.get_int("number").unwrap(), Some(3));
        assert_eq!(record.get_string("comment").unwrap(), None);
        assert!(record.get_string("missing").is_err());
        assert!(record.get_int("name").is_err());
    }

    #[test]
    fn test_get_float_widens() {
        let record = Record::new().set("number", 3i64).set("price", 12.5f64);
        assert_eq!(record.get_float("number").unwrap(), Some(3.0));
        assert_eq!(record.get_float("price").unwrap(), Some(12.5));
    }

    #[test]
    fn test_get_path_nested() {
        let location = Record::new().set("x", 1i64).set("z", 9.5f64);
        let person = Record::new().set("passportID", "AB123").set("location", location);
        let record = Record::new().set("person", person);

        assert_eq!(
            record.get_path("person.passportID"),
            Some(&Value::String("AB123".to_string()))
        );
        assert_eq!(record.get_path("person.location.z"), Some(&Value::Float(9.5)));
        assert_eq!(record.get_path("person.location.y"), None);
        assert_eq!(record.get_path("event.name"), None);
        assert_eq!(record.get_path("person.passportID.inner"), None);
    }

    #[test]
    fn test_insert_id_field_tracks_id() {
        let mut record = Record::new();
        record.insert("id", 7i64);
        assert_eq!(record.id(), Some(7));
    }
}
