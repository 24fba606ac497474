//! Settings resolution: merge, substitute, expand

use super::{LayerSelection, PathExpander, SettingsLayer, substitute_placeholders};
use crate::source::{Fetched, LayerSource, load_layer};
use crate::{ConfigDocument, Diagnostic, Error, HardwareProfile, OverrideStore, Result, merge_all};
use serde_json::Value;

/// The fully merged, substituted and expanded settings document.
///
/// Produced whole by each resolution pass and never patched afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    document: ConfigDocument,
    diagnostics: Vec<Diagnostic>,
}

impl ResolvedSettings {
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn into_document(self) -> ConfigDocument {
        self.document
    }

    /// Dot-path lookup, e.g. `display.resolution`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.document.get_path(path)
    }

    /// Everything recovered from during this pass.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Paths still holding a literal `"auto"`.
    pub fn unresolved_placeholders(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::UnresolvedPlaceholder { path } => Some(path.as_str()),
            _ => None,
        })
    }
}

/// Resolve an ordered list of layers against the process environment.
///
/// Layers are folded left to right (Default, Device, OS, User), then
/// placeholders are filled from `hardware`, then string leaves are expanded.
///
/// ```
/// use sbc_config::{ConfigDocument, HardwareProfile, settings::resolve};
/// use serde_json::json;
///
/// let layers = [
///     ConfigDocument::from_value(json!({"a": 1, "b": {"x": 1}})).unwrap(),
///     ConfigDocument::from_value(json!({"b": {"y": 2}})).unwrap(),
///     ConfigDocument::new(),
///     ConfigDocument::from_value(json!({"b": {"x": 9}})).unwrap(),
/// ];
/// let resolved = resolve(&layers, &HardwareProfile::new());
/// assert_eq!(resolved.document().clone().into_value(), json!({"a": 1, "b": {"x": 9, "y": 2}}));
/// ```
pub fn resolve(layers: &[ConfigDocument], hardware: &HardwareProfile) -> ResolvedSettings {
    resolve_with(layers, hardware, &PathExpander::from_env())
}

/// [`resolve`] with an explicit path expander.
pub fn resolve_with(
    layers: &[ConfigDocument],
    hardware: &HardwareProfile,
    expander: &PathExpander,
) -> ResolvedSettings {
    let mut merged = merge_all(layers).into_map();

    let diagnostics = substitute_placeholders(&mut merged, hardware);
    for diagnostic in &diagnostics {
        diagnostic.emit();
    }

    expander.expand_document(&mut merged);

    ResolvedSettings {
        document: ConfigDocument::from(merged),
        diagnostics,
    }
}

/// Loads the settings layers from a source and resolves them.
///
/// The User layer comes from the in-memory [`OverrideStore`] rather than the
/// source, so unsaved settings overrides take effect immediately.
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    selection: LayerSelection,
    expander: PathExpander,
    annotate: bool,
}

impl SettingsResolver {
    pub fn new(selection: LayerSelection) -> Self {
        Self {
            selection,
            expander: PathExpander::from_env(),
            annotate: true,
        }
    }

    pub fn with_expander(mut self, expander: PathExpander) -> Self {
        self.expander = expander;
        self
    }

    /// Skip the `detected_device` / `detected_os` / `probed_hardware` entries.
    pub fn without_metadata(mut self) -> Self {
        self.annotate = false;
        self
    }

    pub fn selection(&self) -> &LayerSelection {
        &self.selection
    }

    /// Fetch the layers in merge order.
    ///
    /// A missing or malformed Default layer is fatal. Device and OS layers
    /// degrade to empty documents with a diagnostic.
    pub fn load_layers(
        &self,
        source: &dyn LayerSource,
        user: &ConfigDocument,
    ) -> Result<(Vec<ConfigDocument>, Vec<Diagnostic>)> {
        let mut layers = Vec::with_capacity(SettingsLayer::ORDER.len());
        let mut diagnostics = Vec::new();

        for layer in SettingsLayer::ORDER {
            let key = layer.key(&self.selection);
            match layer {
                SettingsLayer::Default => match source.fetch(&key) {
                    Fetched::Document(document) => {
                        tracing::debug!(location = %key, "Loaded default settings layer");
                        layers.push(document);
                    }
                    Fetched::Missing => {
                        return Err(Error::MissingDefaultLayer {
                            kind: "settings",
                            location: key.to_string(),
                        });
                    }
                    Fetched::Malformed { message } => {
                        return Err(Error::MalformedDefaultLayer {
                            kind: "settings",
                            location: key.to_string(),
                            message,
                        });
                    }
                },
                SettingsLayer::Device | SettingsLayer::Os => {
                    let (document, diagnostic) = load_layer(source, &key, layer.as_str());
                    if diagnostic.is_none() {
                        tracing::info!(layer = %layer, location = %key, "Merged settings layer");
                    }
                    layers.push(document);
                    diagnostics.extend(diagnostic);
                }
                SettingsLayer::User => layers.push(user.clone()),
            }
        }

        Ok((layers, diagnostics))
    }

    /// Run a full resolution pass.
    pub fn resolve(
        &self,
        source: &dyn LayerSource,
        overrides: &OverrideStore,
        hardware: &HardwareProfile,
    ) -> Result<ResolvedSettings> {
        let (layers, mut diagnostics) = self.load_layers(source, overrides.settings())?;
        let resolved = resolve_with(&layers, hardware, &self.expander);

        let mut document = resolved.document;
        if self.annotate {
            document.insert("detected_device", Value::String(self.selection.device.clone()));
            document.insert("detected_os", Value::String(self.selection.os.clone()));
            document.insert("probed_hardware", hardware.to_document().into_value());
        }

        diagnostics.extend(resolved.diagnostics);
        Ok(ResolvedSettings {
            document,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DocumentKey, MemorySource};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    fn doc(value: Value) -> ConfigDocument {
        ConfigDocument::from_value(value).unwrap()
    }

    fn resolver() -> SettingsResolver {
        SettingsResolver::new(LayerSelection::new("rg351", "arkos"))
            .with_expander(PathExpander::fixed("/home/ark", HashMap::new()))
    }

    #[test]
    fn layered_example_resolves_to_documented_result() {
        let layers = [
            doc(json!({"a": 1, "b": {"x": 1}})),
            doc(json!({"b": {"y": 2}})),
            doc(json!({})),
            doc(json!({"b": {"x": 9}})),
        ];

        let resolved = resolve_with(&layers, &HardwareProfile::new(), &PathExpander::disabled());

        assert_eq!(
            resolved.document().clone().into_value(),
            json!({"a": 1, "b": {"x": 9, "y": 2}})
        );
        assert!(resolved.diagnostics().is_empty());
    }

    #[test]
    fn placeholder_resolves_from_hardware() {
        let layers = [doc(json!({"display": {"resolution": "auto"}}))];
        let hardware = HardwareProfile::new().with("display.resolution", json!([1280, 720]));

        let resolved = resolve_with(&layers, &hardware, &PathExpander::disabled());

        assert_eq!(resolved.get("display.resolution"), Some(&json!([1280, 720])));
        assert_eq!(resolved.unresolved_placeholders().count(), 0);
    }

    #[test]
    fn unresolved_placeholder_is_reported() {
        let layers = [doc(json!({"display": {"resolution": "auto"}}))];

        let resolved = resolve_with(&layers, &HardwareProfile::new(), &PathExpander::disabled());

        assert_eq!(resolved.get("display.resolution"), Some(&json!("auto")));
        assert_eq!(
            resolved.unresolved_placeholders().collect::<Vec<_>>(),
            vec!["display.resolution"]
        );
    }

    #[test]
    fn placeholder_introduced_by_user_layer_is_substituted() {
        let layers = [
            doc(json!({"display": {"resolution": [640, 480]}})),
            doc(json!({"display": {"resolution": "auto"}})),
        ];
        let hardware = HardwareProfile::standard().with("display.current_resolution", json!([800, 600]));

        let resolved = resolve_with(&layers, &hardware, &PathExpander::disabled());

        assert_eq!(resolved.get("display.resolution"), Some(&json!([800, 600])));
    }

    #[test]
    fn missing_default_layer_is_fatal() {
        let source = MemorySource::new();
        let err = resolver()
            .resolve(&source, &OverrideStore::new(), &HardwareProfile::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingDefaultLayer { kind: "settings", .. }));
    }

    #[test]
    fn malformed_default_layer_is_fatal() {
        let source = MemorySource::new().with_malformed(DocumentKey::settings_default(), "eof");
        let err = resolver()
            .resolve(&source, &OverrideStore::new(), &HardwareProfile::new())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedDefaultLayer { .. }));
    }

    #[test]
    fn missing_device_layer_equals_empty_device_layer() {
        let base = MemorySource::new()
            .with_json(DocumentKey::settings_default(), json!({"display": {"fps": 60}}));
        let with_empty = base
            .clone()
            .with_json(DocumentKey::settings_device("rg351"), json!({}));

        let r = resolver().without_metadata();
        let missing = r
            .resolve(&base, &OverrideStore::new(), &HardwareProfile::new())
            .unwrap();
        let empty = r
            .resolve(&with_empty, &OverrideStore::new(), &HardwareProfile::new())
            .unwrap();

        assert_eq!(missing.document(), empty.document());
        assert!(matches!(
            missing.diagnostics()[0],
            Diagnostic::MissingLayer { ref layer, .. } if layer == "device"
        ));
    }

    #[test]
    fn layers_apply_in_precedence_order_with_user_overrides() {
        let source = MemorySource::new()
            .with_json(
                DocumentKey::settings_default(),
                json!({"display": {"fps": 30, "resolution": "auto"}, "paths": {"data": "~/data"}}),
            )
            .with_json(DocumentKey::settings_device("rg351"), json!({"display": {"fps": 60}}))
            .with_json(DocumentKey::settings_os("arkos"), json!({"paths": {"roms": "/roms"}}));
        let mut overrides = OverrideStore::new();
        overrides.set_setting("display.fps", json!(50)).unwrap();
        let hardware = HardwareProfile::standard().with("display.current_resolution", json!([480, 320]));

        let resolved = resolver().resolve(&source, &overrides, &hardware).unwrap();

        assert_eq!(resolved.get("display.fps"), Some(&json!(50)));
        assert_eq!(resolved.get("display.resolution"), Some(&json!([480, 320])));
        assert_eq!(resolved.get("paths.data"), Some(&json!("/home/ark/data")));
        assert_eq!(resolved.get("paths.roms"), Some(&json!("/roms")));
        assert_eq!(resolved.get("detected_device"), Some(&json!("rg351")));
        assert_eq!(resolved.get("detected_os"), Some(&json!("arkos")));
        assert_eq!(
            resolved.get("probed_hardware.display.current_resolution"),
            Some(&json!([480, 320]))
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let source = MemorySource::new().with_json(
            DocumentKey::settings_default(),
            json!({"display": {"resolution": "auto"}, "paths": {"data": "~/d"}}),
        );
        let overrides = OverrideStore::new();
        let hardware = HardwareProfile::new();

        let first = resolver().resolve(&source, &overrides, &hardware).unwrap();
        let second = resolver().resolve(&source, &overrides, &hardware).unwrap();

        assert_eq!(first, second);
    }
}
