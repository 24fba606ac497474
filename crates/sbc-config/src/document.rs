//! Tree-shaped configuration documents and dot-path access
//!
//! A [`ConfigDocument`] is an ordered mapping from string keys to JSON
//! values. Nested mappings are themselves JSON objects; sequences and
//! scalars are leaves. Consumers address nested values with dot-separated
//! key paths such as `display.resolution`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered, nested mapping loaded from one layer source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a JSON value.
    ///
    /// Only objects are accepted; any other root is rejected.
    ///
    /// ```
    /// use sbc_config::ConfigDocument;
    /// use serde_json::json;
    ///
    /// let doc = ConfigDocument::from_value(json!({"display": {"fps": 60}})).unwrap();
    /// assert_eq!(doc.get_path("display.fps").unwrap(), &json!(60));
    /// assert!(ConfigDocument::from_value(json!([1, 2])).is_err());
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::NotAnObject {
                found: value_kind(&other),
            }),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Top-level lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert or replace a top-level entry.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Traverse a dot-separated key path.
    ///
    /// Returns `None` when any segment is missing or an intermediate value
    /// is not a mapping. A malformed path (empty segment) also yields `None`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let segments = split_path(path).ok()?;
        let (last, parents) = segments.split_last()?;

        let mut current = &self.0;
        for segment in parents {
            current = current.get(*segment)?.as_object()?;
        }
        current.get(*last)
    }

    /// Set a value at a dot-separated key path.
    ///
    /// Intermediate mappings are created as needed. Setting through an
    /// existing non-mapping value is a [`Error::PathConflict`].
    pub fn set_path(&mut self, path: &str, value: Value) -> Result<()> {
        let segments = split_path(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::InvalidKeyPath {
                path: path.to_string(),
            });
        };

        let mut current = &mut self.0;
        for segment in parents {
            let entry = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match entry {
                Value::Object(map) => map,
                _ => {
                    return Err(Error::PathConflict {
                        path: path.to_string(),
                        segment: (*segment).to_string(),
                    });
                }
            };
        }
        current.insert((*last).to_string(), value);
        Ok(())
    }
}

impl From<Map<String, Value>> for ConfigDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ConfigDocument {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::InvalidKeyPath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// Human-readable JSON kind, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
