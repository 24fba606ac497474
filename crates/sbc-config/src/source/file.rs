//! Filesystem-backed layer source

use super::{DocumentKey, Fetched, LayerSink, LayerSource};
use crate::{ConfigDocument, Result};
use sbc_fs::{JsonStore, LoadOutcome, NormalizedPath};
use std::path::Path;

/// Name of the per-user application directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".game_manager";

/// Reads layer documents from disk and writes overrides back.
///
/// Shipped layers (devices, OS types, input mappings) are read from
/// `config_dir`; user-writable documents are read from and written to
/// `data_dir`:
///
/// ```text
/// ~/.game_manager/
///   config/
///     devices/default.json
///     os_types/arkos.json
///     input_mappings/default.json
///   data/
///     user/settings.json
///     input_overrides/device.json
///     input_overrides/games/doom.json
///     runtime/config.json
/// ```
#[derive(Debug, Clone)]
pub struct FileLayerSource {
    config_dir: NormalizedPath,
    data_dir: NormalizedPath,
    store: JsonStore,
}

impl FileLayerSource {
    pub fn new(config_dir: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Self {
        Self {
            config_dir: NormalizedPath::new(config_dir),
            data_dir: NormalizedPath::new(data_dir),
            store: JsonStore::new(),
        }
    }

    /// Use `root/config` and `root/data`.
    pub fn at(root: impl AsRef<Path>) -> Self {
        let root = NormalizedPath::new(root);
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            store: JsonStore::new(),
        }
    }

    /// `~/.game_manager/{config,data}`, if a home directory is known.
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|home| Self::at(home.join(APP_DIR_NAME)))
    }

    pub fn config_dir(&self) -> &NormalizedPath {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &NormalizedPath {
        &self.data_dir
    }

    /// Absolute location of a document.
    pub fn path_for(&self, key: &DocumentKey) -> NormalizedPath {
        let root = if key.kind.is_user_writable() {
            &self.data_dir
        } else {
            &self.config_dir
        };
        root.join(&key.relative_path())
    }
}

impl LayerSource for FileLayerSource {
    fn fetch(&self, key: &DocumentKey) -> Fetched {
        let path = self.path_for(key);
        match self.store.load(&path) {
            Ok(LoadOutcome::Found(value)) => match ConfigDocument::from_value(value) {
                Ok(document) => Fetched::Document(document),
                Err(e) => Fetched::Malformed {
                    message: e.to_string(),
                },
            },
            Ok(LoadOutcome::Missing) => Fetched::Missing,
            Ok(LoadOutcome::Malformed { message }) => Fetched::Malformed { message },
            // Unreadable is treated like unparsable: the layer degrades to empty
            Err(e) => Fetched::Malformed {
                message: e.to_string(),
            },
        }
    }
}

impl LayerSink for FileLayerSource {
    fn store(&mut self, key: &DocumentKey, document: &ConfigDocument) -> Result<()> {
        let path = self.path_for(key);
        self.store.save(&path, document)?;
        tracing::info!(%path, "Saved override document");
        Ok(())
    }
}
