//! Runtime settings layered over a resolved snapshot

use crate::settings::ResolvedSettings;
use crate::source::{DocumentKey, LayerSink, LayerSource, load_layer};
use crate::{ConfigDocument, Diagnostic, Result, merge};
use serde_json::Value;

/// Values the application changes while running, read ahead of the
/// resolved settings.
///
/// Runtime values live in their own document (`runtime/config.json`) and
/// never touch the layer documents. A `null` runtime value counts as unset
/// and falls through to the resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    resolved: ResolvedSettings,
    runtime: ConfigDocument,
    dirty: bool,
}

impl RuntimeSettings {
    /// Wrap a resolved snapshot with an empty runtime document.
    pub fn new(resolved: ResolvedSettings) -> Self {
        Self::with_runtime(resolved, ConfigDocument::new())
    }

    pub fn with_runtime(resolved: ResolvedSettings, runtime: ConfigDocument) -> Self {
        Self {
            resolved,
            runtime,
            dirty: false,
        }
    }

    /// Wrap a resolved snapshot and load the runtime document from `source`.
    pub fn load(resolved: ResolvedSettings, source: &dyn LayerSource) -> (Self, Option<Diagnostic>) {
        let (runtime, diagnostic) = load_layer(source, &DocumentKey::runtime(), "runtime");
        (Self::with_runtime(resolved, runtime), diagnostic)
    }

    /// Dot-path lookup: runtime value first, then the resolved settings.
    pub fn get(&self, path: &str) -> Option<&Value> {
        match self.runtime.get_path(path) {
            Some(value) if !value.is_null() => Some(value),
            _ => self.resolved.get(path),
        }
    }

    pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    /// Set a runtime value, creating intermediate mappings.
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        self.runtime.set_path(path, value)?;
        self.dirty = true;
        tracing::debug!(%path, "Runtime setting changed");
        Ok(())
    }

    pub fn resolved(&self) -> &ResolvedSettings {
        &self.resolved
    }

    pub fn runtime(&self) -> &ConfigDocument {
        &self.runtime
    }

    /// Swap in a fresh resolution pass, keeping runtime values.
    pub fn replace_resolved(&mut self, resolved: ResolvedSettings) {
        self.resolved = resolved;
    }

    /// Resolved settings with runtime values merged on top.
    pub fn merged(&self) -> ConfigDocument {
        merge(self.resolved.document(), &self.runtime)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the runtime document, creating it if it does not exist yet.
    pub fn save(&mut self, sink: &mut dyn LayerSink) -> Result<()> {
        sink.store(&DocumentKey::runtime(), &self.runtime)?;
        self.dirty = false;
        tracing::info!(location = %DocumentKey::runtime(), "Saved runtime settings");
        Ok(())
    }
}
