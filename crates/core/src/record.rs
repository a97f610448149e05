//! Records: uniform rows the tabular view engine operates on.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::value::Value;

/// Name of the mandatory identifier field.
pub const ID_FIELD: &str = "id";

/// A uniform record with a unique identifier and named fields.
///
/// Field keys are plain strings so the view engine can stay generic over
/// record shape. Unknown keys read as [`Value::Null`].
pub trait Record {
    /// The record's unique identifier.
    fn id(&self) -> &str;

    /// Read a field by key.
    fn field(&self, key: &str) -> Value;
}

impl<R: Record + ?Sized> Record for &R {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn field(&self, key: &str) -> Value {
        (**self).field(key)
    }
}

/// Errors that can occur when building [`Row`]s from JSON.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The input is not a JSON array of records.
    #[error("expected a JSON array of records")]
    NotAnArray,
    /// An element is not a JSON object.
    #[error("record {index} is not a JSON object")]
    NotAnObject {
        /// Position in the input array.
        index: usize,
    },
    /// An element has no `id` field.
    #[error("record {index} has no id field")]
    MissingId {
        /// Position in the input array.
        index: usize,
    },
    /// An element's `id` is not a non-empty string or a number.
    #[error("record {index} has an invalid id")]
    InvalidId {
        /// Position in the input array.
        index: usize,
    },
    /// Two elements share the same `id`.
    #[error("duplicate record id: {0}")]
    DuplicateId(String),
}

/// A schemaless record backed by a sorted field map.
///
/// The `id` is also available as a regular field so it can be searched,
/// sorted and exported like any other column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: String,
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Create an empty row with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_owned(), Value::Text(id.clone()));
        Self { id, fields }
    }

    /// Set a field, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a field. Setting `id` is ignored; the identifier is fixed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if key == ID_FIELD {
            return;
        }
        self.fields.insert(key, value.into());
    }

    /// Field keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Build a row from a JSON object at position `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or lacks a usable `id`.
    pub fn from_json(index: usize, value: serde_json::Value) -> Result<Self, RecordError> {
        let serde_json::Value::Object(map) = value else {
            return Err(RecordError::NotAnObject { index });
        };

        let (id, id_value) = match map.get(ID_FIELD) {
            None => return Err(RecordError::MissingId { index }),
            Some(serde_json::Value::String(s)) if !s.is_empty() => {
                (s.clone(), Value::Text(s.clone()))
            }
            // Numeric ids keep their number so they sort numerically.
            Some(serde_json::Value::Number(n)) => (
                n.to_string(),
                Value::from(serde_json::Value::Number(n.clone())),
            ),
            Some(_) => return Err(RecordError::InvalidId { index }),
        };

        let mut row = Self::new(id);
        row.fields.insert(ID_FIELD.to_owned(), id_value);
        for (key, value) in map {
            row.set(key, Value::from(value));
        }
        Ok(row)
    }

    /// Build rows from a JSON array of objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not an array, an element is not a
    /// valid record, or two records share an identifier.
    pub fn many_from_json(value: serde_json::Value) -> Result<Vec<Self>, RecordError> {
        let serde_json::Value::Array(items) = value else {
            return Err(RecordError::NotAnArray);
        };

        let mut seen = std::collections::HashSet::new();
        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let row = Self::from_json(index, item)?;
            if !seen.insert(row.id.clone()) {
                return Err(RecordError::DuplicateId(row.id));
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

impl Record for Row {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Value {
        self.fields.get(key).cloned().unwrap_or_default()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.fields)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_row_fields() {
        let row = Row::new("1").with("name", "Bob").with("amt", 5_i64);
        assert_eq!(row.id(), "1");
        assert_eq!(row.field("id"), Value::from("1"));
        assert_eq!(row.field("name"), Value::from("Bob"));
        assert_eq!(row.field("amt"), Value::from(5_i64));
        assert_eq!(row.field("missing"), Value::Null);
    }

    #[test]
    fn test_id_cannot_be_overwritten() {
        let row = Row::new("1").with("id", "2");
        assert_eq!(row.id(), "1");
        assert_eq!(row.field("id"), Value::from("1"));
    }

    #[test]
    fn test_from_json_numeric_id() {
        let row = Row::from_json(0, json!({"id": 7, "name": "Cy"})).unwrap();
        assert_eq!(row.id(), "7");
        assert_eq!(row.field("id"), Value::from(7_i64));
        assert_eq!(row.field("name"), Value::from("Cy"));
    }

    #[test]
    fn test_numeric_ids_sort_numerically() {
        let mut rows = Row::many_from_json(json!([{"id": 10}, {"id": 2}, {"id": 1}])).unwrap();
        rows.sort_by(|a, b| a.field("id").natural_cmp(&b.field("id")));
        let ids: Vec<&str> = rows.iter().map(Record::id).collect();
        assert_eq!(ids, ["1", "2", "10"]);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert_eq!(
            Row::from_json(3, json!([1])),
            Err(RecordError::NotAnObject { index: 3 })
        );
        assert_eq!(
            Row::from_json(0, json!({"name": "x"})),
            Err(RecordError::MissingId { index: 0 })
        );
        assert_eq!(
            Row::from_json(1, json!({"id": ""})),
            Err(RecordError::InvalidId { index: 1 })
        );
        assert_eq!(
            Row::from_json(1, json!({"id": null})),
            Err(RecordError::InvalidId { index: 1 })
        );
    }

    #[test]
    fn test_many_from_json() {
        let rows = Row::many_from_json(json!([
            {"id": "a", "n": 1},
            {"id": "b", "n": 2}
        ]))
        .unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(
            Row::many_from_json(json!({"id": "a"})),
            Err(RecordError::NotAnArray)
        );
        assert_eq!(
            Row::many_from_json(json!([{"id": "a"}, {"id": "a"}])),
            Err(RecordError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn test_row_serializes_as_flat_object() {
        let row = Row::new("1").with("name", "Bob");
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, json!({"id": "1", "name": "Bob"}));
    }
}
