//! Deep merge of configuration documents
//!
//! Mappings present on both sides merge recursively. Every other pairing
//! (scalar, sequence, null, or a type mismatch) is a wholesale replacement
//! by the overlay. Sequences are never concatenated.

use crate::ConfigDocument;
use serde_json::{Map, Value};

/// Merge `overlay` on top of `base`, producing a new document.
///
/// Neither input is modified and the result shares nothing with them.
/// An explicit `null` in the overlay replaces the base value; there is no
/// way to delete a key.
///
/// ```
/// use sbc_config::{ConfigDocument, merge};
/// use serde_json::json;
///
/// let base = ConfigDocument::from_value(json!({"a": 1, "b": {"x": 1}})).unwrap();
/// let overlay = ConfigDocument::from_value(json!({"b": {"y": 2}})).unwrap();
/// let merged = merge(&base, &overlay);
/// assert_eq!(merged.into_value(), json!({"a": 1, "b": {"x": 1, "y": 2}}));
/// ```
pub fn merge(base: &ConfigDocument, overlay: &ConfigDocument) -> ConfigDocument {
    let mut result = base.as_map().clone();
    merge_map(&mut result, overlay.as_map());
    ConfigDocument::from(result)
}

/// Fold [`merge`] left to right over an ordered list of layers.
///
/// Later layers win. An empty list yields an empty document.
pub fn merge_all<'a, I>(layers: I) -> ConfigDocument
where
    I: IntoIterator<Item = &'a ConfigDocument>,
{
    let mut result = Map::new();
    for layer in layers {
        merge_map(&mut result, layer.as_map());
    }
    ConfigDocument::from(result)
}

fn merge_map(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, overlay_val) in overlay {
        if let Some(base_val) = base.get_mut(key) {
            merge_value(base_val, overlay_val);
        } else {
            base.insert(key.clone(), overlay_val.clone());
        }
    }
}

fn merge_value(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            merge_map(base_map, overlay_map);
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}
