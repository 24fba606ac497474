//! Probed hardware capabilities
//!
//! The probe itself runs elsewhere; this module only holds its output as a
//! flat map from dot-separated capability path to concrete value.

use crate::ConfigDocument;
use serde_json::Value;
use std::collections::BTreeMap;

/// Flat capability map used to fill `"auto"` placeholders.
///
/// Lookups try the exact settings path first, then any alias registered
/// for that path. Aliases connect settings paths to the names the probe
/// reports, e.g. `display.resolution` to `display.current_resolution`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardwareProfile {
    values: BTreeMap<String, Value>,
    aliases: BTreeMap<String, String>,
}

impl HardwareProfile {
    /// Empty profile with no aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty profile with the aliases used by the stock settings files.
    pub fn standard() -> Self {
        Self::new().with_alias("display.resolution", "display.current_resolution")
    }

    /// Flatten nested probe output into dot paths.
    ///
    /// Mappings are descended; sequences and scalars become values.
    /// A non-object root yields an empty profile.
    ///
    /// ```
    /// use sbc_config::HardwareProfile;
    /// use serde_json::json;
    ///
    /// let profile = HardwareProfile::from_probe(&json!({
    ///     "display": {"current_resolution": [640, 480]},
    ///     "cpu": {"core_count": 4}
    /// }));
    /// assert_eq!(profile.get("cpu.core_count"), Some(&json!(4)));
    /// ```
    pub fn from_probe(probe: &Value) -> Self {
        let mut profile = Self::new();
        if let Value::Object(map) = probe {
            for (key, value) in map {
                profile.flatten_into(key.clone(), value);
            }
        }
        profile
    }

    fn flatten_into(&mut self, path: String, value: &Value) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    self.flatten_into(format!("{path}.{key}"), child);
                }
            }
            other => {
                self.values.insert(path, other.clone());
            }
        }
    }

    /// Add or replace a capability value.
    pub fn insert(&mut self, path: impl Into<String>, value: Value) {
        self.values.insert(path.into(), value);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, path: impl Into<String>, value: Value) -> Self {
        self.insert(path, value);
        self
    }

    /// Resolve `target` from `source` when `target` itself was not probed.
    pub fn with_alias(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.aliases.insert(target.into(), source.into());
        self
    }

    /// Merge another profile's values and aliases on top of this one.
    pub fn extend(&mut self, other: HardwareProfile) {
        self.values.extend(other.values);
        self.aliases.extend(other.aliases);
    }

    /// Exact value at `path`, ignoring aliases.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    /// Value for a settings path, following its alias if needed.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.values.get(path).or_else(|| {
            self.aliases
                .get(path)
                .and_then(|source| self.values.get(source))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Rebuild a nested document from the flat values.
    ///
    /// Used to snapshot the probe into resolved settings. Paths that
    /// collide with a shorter scalar path are skipped.
    pub fn to_document(&self) -> ConfigDocument {
        let mut document = ConfigDocument::new();
        for (path, value) in &self.values {
            if let Err(e) = document.set_path(path, value.clone()) {
                tracing::debug!(%path, error = %e, "Skipping conflicting probe path");
            }
        }
        document
    }
}

impl FromIterator<(String, Value)> for HardwareProfile {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
            aliases: BTreeMap::new(),
        }
    }
}
