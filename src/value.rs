//! Decoded row types.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Raw or uncast text.
    String(String),
    /// A cast numeric value; may be NaN when a cast column saw a non-number.
    Number(f64),
    /// A cast boolean value.
    Bool(bool),
    /// An absent cell. Renders as an empty field.
    Null,
}

impl Value {
    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Renders the cell the way it appears in delimited text, unescaped.
///
/// Whole numbers print without a fractional part, non-finite numbers print
/// as `NaN`/`Infinity`/`-Infinity`, and `Null` prints nothing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => fmt_number(*n, f),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => Ok(()),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // Covers negative zero
        f.write_str("0")
    } else {
        write!(f, "{n}")
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// An object-shaped row: field names mapped to values, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Values in field order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append without checking for an existing key.
    ///
    /// Callers must guarantee `key` is not already present.
    pub(crate) fn push_unique(&mut self, key: String, value: Value) {
        self.entries.push((key, value));
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    record.insert(key, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// A decoded row, array- or object-shaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Row {
    /// Positional cells (no header).
    Array(Vec<Value>),
    /// Named cells (header present).
    Object(Record),
}

impl Row {
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Row::Array(_))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Row::Object(_))
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Row::Array(cells) => Some(cells),
            Row::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&Record> {
        match self {
            Row::Object(record) => Some(record),
            Row::Array(_) => None,
        }
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        match self {
            Row::Array(cells) => cells.len(),
            Row::Object(record) => record.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a cell by field name. Array rows have no names.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Row::Object(record) => record.get(key),
            Row::Array(_) => None,
        }
    }
}

impl From<Vec<Value>> for Row {
    fn from(cells: Vec<Value>) -> Self {
        Row::Array(cells)
    }
}

impl From<Record> for Row {
    fn from(record: Record) -> Self {
        Row::Object(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("a,b").to_string(), "a,b");
        assert_eq!(Value::from(32).to_string(), "32");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_record_insert_keeps_position() {
        let mut record = Record::new();
        record.insert("a", "1");
        record.insert("b", "2");
        record.insert("a", "3");

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::from("3")));
        assert_eq!(record.get("c"), None);
    }

    #[test]
    fn test_record_json_preserves_order() {
        let json = r#"{"zeta":"1","alpha":2,"mid":true,"gone":null}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "mid", "gone"]
        );
        assert_eq!(record.get("alpha"), Some(&Value::Number(2.0)));
        assert_eq!(record.get("gone"), Some(&Value::Null));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"zeta":"1","alpha":2.0,"mid":true,"gone":null}"#
        );
    }

    #[test]
    fn test_row_json_shapes() {
        let rows: Vec<Row> = serde_json::from_str(r#"[["1","2"],{"name":"Will"}]"#).unwrap();

        assert_eq!(rows[0], Row::Array(vec!["1".into(), "2".into()]));
        assert!(rows[1].is_object());
        assert_eq!(rows[1].get("name"), Some(&Value::from("Will")));
    }
}
