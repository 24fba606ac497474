//! Layer document sources and write-back sinks
//!
//! The engine never touches storage directly. A [`LayerSource`] hands it
//! already-parsed documents (or reports that one is missing or malformed)
//! and a [`LayerSink`] accepts override documents to persist.
//!
//! # Document locations
//!
//! Every document is addressed by a [`DocumentKey`] whose relative location
//! follows `{layer-kind}/{identifier}.json`:
//!
//! ```text
//! devices/default.json              settings Default
//! devices/{device}.json             settings Device
//! os_types/{os}.json                settings OS
//! user/settings.json                settings User (writable)
//! input_mappings/default.json       input Default
//! input_mappings/{device}.json      input Device
//! input_overrides/device.json       input User (writable)
//! input_overrides/games/{id}.json   input Context (writable)
//! runtime/config.json               runtime settings (writable)
//! ```

mod file;
mod memory;

pub use file::FileLayerSource;
pub use memory::MemorySource;

use crate::{ConfigDocument, Diagnostic, Result};
use std::fmt;

/// Directory-level grouping of layer documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    /// Shipped default and per-device settings
    Devices,
    /// Shipped per-OS settings
    OsTypes,
    /// User settings overrides
    UserSettings,
    /// Shipped default and per-device input mappings
    InputMappings,
    /// User input overrides
    InputOverrides,
    /// Per-context (per-game) input overrides
    ContextOverrides,
    /// Runtime settings written by the application
    Runtime,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::OsTypes => "os_types",
            Self::UserSettings => "user",
            Self::InputMappings => "input_mappings",
            Self::InputOverrides => "input_overrides",
            Self::ContextOverrides => "input_overrides/games",
            Self::Runtime => "runtime",
        }
    }

    /// Whether documents of this kind live in the user-writable data root.
    pub fn is_user_writable(&self) -> bool {
        matches!(
            self,
            Self::UserSettings | Self::InputOverrides | Self::ContextOverrides | Self::Runtime
        )
    }
}

/// Identifies one layer document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    pub kind: DocumentKind,
    pub id: String,
}

impl DocumentKey {
    pub fn new(kind: DocumentKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn settings_default() -> Self {
        Self::new(DocumentKind::Devices, "default")
    }

    pub fn settings_device(device: &str) -> Self {
        Self::new(DocumentKind::Devices, device)
    }

    pub fn settings_os(os: &str) -> Self {
        Self::new(DocumentKind::OsTypes, os)
    }

    pub fn user_settings() -> Self {
        Self::new(DocumentKind::UserSettings, "settings")
    }

    pub fn input_default() -> Self {
        Self::new(DocumentKind::InputMappings, "default")
    }

    pub fn input_device(device: &str) -> Self {
        Self::new(DocumentKind::InputMappings, device)
    }

    pub fn input_user() -> Self {
        Self::new(DocumentKind::InputOverrides, "device")
    }

    pub fn input_context(context_id: &str) -> Self {
        Self::new(DocumentKind::ContextOverrides, context_id)
    }

    pub fn runtime() -> Self {
        Self::new(DocumentKind::Runtime, "config")
    }

    /// Slash-separated location relative to the source root.
    pub fn relative_path(&self) -> String {
        format!("{}/{}.json", self.kind.as_str(), self.id)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}

/// Whether `id` can name a context override document.
///
/// Context ids become file names under `input_overrides/games/`, so an id
/// must be one non-empty path segment.
pub fn is_valid_context_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

/// Result of asking a source for one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Document(ConfigDocument),
    Missing,
    Malformed { message: String },
}

/// Supplies parsed layer documents.
///
/// Implementations must not fail: absence and parse errors are reported
/// through [`Fetched`] so the resolver can degrade to an empty layer.
pub trait LayerSource {
    fn fetch(&self, key: &DocumentKey) -> Fetched;
}

/// Persists override documents handed back by the engine.
pub trait LayerSink {
    fn store(&mut self, key: &DocumentKey, document: &ConfigDocument) -> Result<()>;
}

impl<T: LayerSource + ?Sized> LayerSource for &T {
    fn fetch(&self, key: &DocumentKey) -> Fetched {
        (**self).fetch(key)
    }
}

impl<T: LayerSource + ?Sized> LayerSource for Box<T> {
    fn fetch(&self, key: &DocumentKey) -> Fetched {
        (**self).fetch(key)
    }
}

/// Fetch a layer, degrading to an empty document.
///
/// The returned diagnostic (if any) has already been logged.
pub fn load_layer(
    source: &dyn LayerSource,
    key: &DocumentKey,
    layer: &str,
) -> (ConfigDocument, Option<Diagnostic>) {
    let diagnostic = match source.fetch(key) {
        Fetched::Document(document) => {
            tracing::debug!(%layer, location = %key, "Loaded layer document");
            return (document, None);
        }
        Fetched::Missing => Diagnostic::MissingLayer {
            layer: layer.to_string(),
            location: key.to_string(),
        },
        Fetched::Malformed { message } => Diagnostic::MalformedDocument {
            layer: layer.to_string(),
            location: key.to_string(),
            message,
        },
    };
    diagnostic.emit();
    (ConfigDocument::new(), Some(diagnostic))
}
