//! Canonical cell values
//!
//! Raw field values arrive in whatever shape the transport chose: plain
//! numbers, numeric strings, or big-decimal wrappers. [`CellValue::coerce`]
//! normalizes them so comparison and display use one rule per logical field,
//! no matter how the backend serialized it.

use std::fmt;

use ticketgrid_lib::model::Value;

/// Placeholder rendered for absent values.
pub const EMPTY_CELL: &str = "—";

/// The canonical comparable/renderable form of a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent value.
    Null,
    /// Numeric value.
    Num(f64),
    /// Text value.
    Text(String),
    /// Composite value, compared element-wise.
    List(Vec<CellValue>),
}

impl CellValue {
    /// Coerces a raw record value into its canonical form.
    ///
    /// Numbers pass through. Strings become numbers only when the trimmed
    /// string is non-empty and fully numeric. Decimals collapse to their
    /// numeric value. Nested records have no scalar form and coerce to null.
    pub fn coerce(value: &Value) -> CellValue {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Text(b.to_string()),
            Value::Int(n) => CellValue::Num(*n as f64),
            Value::Float(n) if n.is_finite() => CellValue::Num(*n),
            Value::Float(_) => CellValue::Null,
            Value::Decimal(d) => match value.as_f64() {
                Some(n) if n.is_finite() => CellValue::Num(n),
                _ => CellValue::Text(d.to_string()),
            },
            Value::String(s) => match parse_numeric(s) {
                Some(n) => CellValue::Num(n),
                None => CellValue::Text(s.clone()),
            },
            Value::Record(_) => CellValue::Null,
            Value::List(items) => CellValue::List(items.iter().map(CellValue::coerce).collect()),
        }
    }

    /// Coerces an optional value; absent becomes null.
    pub fn coerce_opt(value: Option<&Value>) -> CellValue {
        match value {
            Some(value) => CellValue::coerce(value),
            None => CellValue::Null,
        }
    }

    /// Returns `true` if this is the null cell.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the numeric form, if this cell is numeric.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            CellValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// The string form used for substring search.
    ///
    /// Unlike [`Display`](fmt::Display), null contributes nothing here, so a
    /// query can never match the placeholder of an absent value.
    pub fn search_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Parses a string as a number iff it is non-empty and fully numeric.
fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn write_num(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str(EMPTY_CELL),
            CellValue::Num(n) => write_num(f, *n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // JSON-like element forms inside composites
                    match item {
                        CellValue::Null => f.write_str("null")?,
                        CellValue::Num(n) => write_num(f, *n)?,
                        CellValue::Text(s) => write!(f, "\"{s}\"")?,
                        nested @ CellValue::List(_) => write!(f, "{nested}")?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}
