//! Per-decode row constructors.
//!
//! A [`RowConstructor`] is built once per decode call from the header names
//! and the first data row, then reused for every row. Column layout and cast
//! rules are captured as data so nothing is re-derived per row.

use foldhash::{HashMap, HashMapExt};

use crate::cast::ColumnCast;
use crate::value::{Record, Row, Value};

/// Output shape of a constructor.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    /// Positional cells, as many as the sample row had.
    Array(usize),
    /// Named cells: unique keys in first-appearance order, each paired with
    /// the column it reads from.
    Object(Vec<(String, usize)>),
}

/// Turns raw field arrays into finished rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowConstructor {
    shape: Shape,
    /// Frozen cast rule per sampled column. Empty when casting is off.
    casts: Vec<ColumnCast>,
}

impl RowConstructor {
    /// Build a constructor.
    ///
    /// With `fields`, rows become records keyed by those names; a name listed
    /// twice keeps its first position and reads the later column. Without,
    /// rows stay positional and take the sample's width: extra fields are
    /// dropped and missing ones become `Null`. With `cast`, each column's rule
    /// is inferred from the matching `sample` value; named columns past the
    /// sample width stay text.
    pub fn build<S: AsRef<str>>(fields: Option<&[String]>, sample: &[S], cast: bool) -> Self {
        let shape = match fields {
            Some(names) => Shape::Object(plan_keys(names)),
            None => Shape::Array(sample.len()),
        };

        let casts = if cast {
            sample.iter().map(|v| ColumnCast::detect(v.as_ref())).collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            object = matches!(shape, Shape::Object(_)),
            columns = sample.len(),
            casts = ?casts,
            "built row constructor"
        );

        Self { shape, casts }
    }

    /// Cast rules decided from the sample row.
    pub fn casts(&self) -> &[ColumnCast] {
        &self.casts
    }

    /// Field names for object rows, in output order.
    pub fn field_names(&self) -> Option<Vec<&str>> {
        match &self.shape {
            Shape::Object(keys) => Some(keys.iter().map(|(k, _)| k.as_str()).collect()),
            Shape::Array(_) => None,
        }
    }

    /// Materialize one row.
    pub fn construct<S: AsRef<str>>(&self, raw: &[S]) -> Row {
        match &self.shape {
            Shape::Array(width) => {
                Row::Array((0..*width).map(|idx| self.column(raw, idx)).collect())
            }
            Shape::Object(keys) => {
                let mut record = Record::with_capacity(keys.len());
                for (key, idx) in keys {
                    record.push_unique(key.clone(), self.column(raw, *idx));
                }
                Row::Object(record)
            }
        }
    }

    /// Column `idx` of `raw`, or `Null` past its end.
    fn column<S: AsRef<str>>(&self, raw: &[S], idx: usize) -> Value {
        raw.get(idx)
            .map_or(Value::Null, |field| self.cell(idx, field.as_ref()))
    }

    #[inline]
    fn cell(&self, idx: usize, raw: &str) -> Value {
        self.casts
            .get(idx)
            .copied()
            .unwrap_or_default()
            .apply(raw)
    }
}

/// Resolve header names to unique keys, each reading its last listed column.
fn plan_keys(names: &[String]) -> Vec<(String, usize)> {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(names.len());
    let mut keys: Vec<(String, usize)> = Vec::with_capacity(names.len());

    for (idx, name) in names.iter().enumerate() {
        match slots.get(name.as_str()) {
            Some(&slot) => keys[slot].1 = idx,
            None => {
                slots.insert(name.as_str(), keys.len());
                keys.push((name.clone(), idx));
            }
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_array_uncast() {
        let ctor = RowConstructor::build(None, &["1", "true"], false);
        let row = ctor.construct(&["1", "true"]);

        assert_eq!(row, Row::Array(vec!["1".into(), "true".into()]));
        assert!(ctor.casts().is_empty());
    }

    #[test]
    fn test_array_cast_frozen_from_sample() {
        let ctor = RowConstructor::build(None, &["1", "t", "x"], true);
        assert_eq!(
            ctor.casts(),
            &[ColumnCast::Number, ColumnCast::Boolean, ColumnCast::Text]
        );

        let row = ctor.construct(&["2.5", "f", "y"]);
        assert_eq!(
            row,
            Row::Array(vec![Value::Number(2.5), Value::Bool(false), "y".into()])
        );

        let row = ctor.construct(&["n/a", "true", "z"]);
        let cells = row.as_array().unwrap();
        assert!(cells[0].as_f64().unwrap().is_nan());
        assert_eq!(cells[1], Value::Bool(true));
    }

    #[test]
    fn test_array_width_fixed_by_sample() {
        let ctor = RowConstructor::build(None, &["a", "b"], false);

        // Wider rows are truncated, narrower rows padded
        assert_eq!(
            ctor.construct(&["3", "4", "5"]),
            Row::Array(vec!["3".into(), "4".into()])
        );
        assert_eq!(
            ctor.construct(&["6"]),
            Row::Array(vec!["6".into(), Value::Null])
        );
    }

    #[test]
    fn test_object_short_row_is_null_padded() {
        let fields = names(&["name", "age", "city"]);
        let ctor = RowConstructor::build(Some(&fields), &["Will", "32", "Oslo"], true);

        let row = ctor.construct(&["Ann", "41"]);
        let record = row.as_object().unwrap();

        assert_eq!(record.get("name"), Some(&Value::from("Ann")));
        assert_eq!(record.get("age"), Some(&Value::Number(41.0)));
        assert_eq!(record.get("city"), Some(&Value::Null));
        assert_eq!(ctor.field_names(), Some(vec!["name", "age", "city"]));
    }

    #[test]
    fn test_object_duplicate_names() {
        let fields = names(&["a", "b", "a"]);
        let ctor = RowConstructor::build(Some(&fields), &["1", "2", "3"], false);

        let row = ctor.construct(&["1", "2", "3"]);
        let record = row.as_object().unwrap();

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::from("3")));
    }
}
