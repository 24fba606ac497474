//! `"auto"` placeholder substitution

use crate::{Diagnostic, HardwareProfile};
use serde_json::{Map, Value};

/// Sentinel string marking a value the hardware probe should supply.
pub const AUTO: &str = "auto";

/// How a mapping leaf participates in substitution.
///
/// The sentinel is recognised by exact string match, so a user override
/// that sets a leaf to the string `"auto"` also requests substitution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Placeholder,
    Concrete(&'a Value),
}

impl<'a> Slot<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) if s == AUTO => Self::Placeholder,
            other => Self::Concrete(other),
        }
    }
}

/// Replace every placeholder leaf with its hardware value.
///
/// Only mapping leaves are considered; elements inside sequences are never
/// placeholders. Leaves with no matching profile entry stay `"auto"` and
/// produce an [`Diagnostic::UnresolvedPlaceholder`] each.
pub fn substitute_placeholders(
    document: &mut Map<String, Value>,
    hardware: &HardwareProfile,
) -> Vec<Diagnostic> {
    let mut gaps = Vec::new();
    walk(document, hardware, "", &mut gaps);
    gaps
}

fn walk(
    map: &mut Map<String, Value>,
    hardware: &HardwareProfile,
    prefix: &str,
    gaps: &mut Vec<Diagnostic>,
) {
    for (key, value) in map.iter_mut() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Value::Object(child) = value {
            walk(child, hardware, &path, gaps);
            continue;
        }

        if Slot::classify(value) == Slot::Placeholder {
            match hardware.lookup(&path) {
                Some(probed) => {
                    tracing::debug!(%path, value = %probed, "Substituted probed value");
                    *value = probed.clone();
                }
                None => gaps.push(Diagnostic::UnresolvedPlaceholder { path }),
            }
        }
    }
}
