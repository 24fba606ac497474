//! In-memory layer source

use super::{DocumentKey, Fetched, LayerSink, LayerSource};
use crate::{ConfigDocument, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Layer documents held in memory.
///
/// Used by tests and by hosts that fetch documents themselves. Stored
/// overrides replace the previous entry for their key.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<DocumentKey, Fetched>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document from a JSON value; a non-object root is recorded as malformed.
    pub fn with_json(mut self, key: DocumentKey, value: Value) -> Self {
        let fetched = match ConfigDocument::from_value(value) {
            Ok(document) => Fetched::Document(document),
            Err(e) => Fetched::Malformed {
                message: e.to_string(),
            },
        };
        self.documents.insert(key, fetched);
        self
    }

    /// Record a document that exists but does not parse.
    pub fn with_malformed(mut self, key: DocumentKey, message: impl Into<String>) -> Self {
        self.documents.insert(
            key,
            Fetched::Malformed {
                message: message.into(),
            },
        );
        self
    }

    /// The stored document for `key`, if it parsed.
    pub fn document(&self, key: &DocumentKey) -> Option<&ConfigDocument> {
        match self.documents.get(key) {
            Some(Fetched::Document(document)) => Some(document),
            _ => None,
        }
    }
}

impl LayerSource for MemorySource {
    fn fetch(&self, key: &DocumentKey) -> Fetched {
        self.documents.get(key).cloned().unwrap_or(Fetched::Missing)
    }
}

impl LayerSink for MemorySource {
    fn store(&mut self, key: &DocumentKey, document: &ConfigDocument) -> Result<()> {
        self.documents
            .insert(key.clone(), Fetched::Document(document.clone()));
        Ok(())
    }
}
