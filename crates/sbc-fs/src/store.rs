//! JSON document loading and saving

use crate::{Error, NormalizedPath, Result, io};
use serde::Serialize;
use serde_json::Value;

/// What was found when loading a document from disk.
///
/// Absence and parse failure are ordinary outcomes for layer documents, so
/// they are reported as values rather than errors. Only I/O failures other
/// than "not found" surface as [`Error`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The file existed and parsed as JSON
    Found(Value),
    /// No file at the path
    Missing,
    /// The file existed but did not parse
    Malformed { message: String },
}

/// Loads and saves JSON documents.
///
/// Saved documents are pretty-printed and written atomically.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonStore;

impl JsonStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a JSON document.
    pub fn load(&self, path: &NormalizedPath) -> Result<LoadOutcome> {
        let Some(content) = io::read_text_optional(path)? else {
            tracing::debug!(%path, "Document not found");
            return Ok(LoadOutcome::Missing);
        };

        match serde_json::from_str(&content) {
            Ok(value) => {
                tracing::debug!(%path, "Loaded document");
                Ok(LoadOutcome::Found(value))
            }
            Err(e) => Ok(LoadOutcome::Malformed {
                message: e.to_string(),
            }),
        }
    }

    /// Save a value as pretty-printed JSON with a trailing newline.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(value).map_err(|e| Error::Serialize {
                path: path.to_native(),
                message: e.to_string(),
            })?;
        content.push('\n');
        io::write_atomic(path, content.as_bytes())
    }
}
