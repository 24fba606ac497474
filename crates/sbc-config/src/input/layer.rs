//! Input-mapping layers

use super::{BindingSet, InputToken, LogicalAction};
use crate::ConfigDocument;
use crate::document::value_kind;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One position in the input precedence chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputLayer {
    Default,
    Device,
    User,
    Context,
}

impl InputLayer {
    /// Merge order, lowest precedence first.
    pub const ORDER: [InputLayer; 4] = [Self::Default, Self::Device, Self::User, Self::Context];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "input default",
            Self::Device => "input device",
            Self::User => "input user",
            Self::Context => "input context",
        }
    }
}

impl fmt::Display for InputLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action to binding-set table parsed from one layer document.
///
/// Layer documents map each action name to a list of token names:
///
/// ```json
/// { "confirm": ["RETURN", "BUTTON_A"], "cancel": ["ESCAPE"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputMapping {
    bindings: BTreeMap<LogicalAction, BindingSet>,
}

impl InputMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a layer document.
    ///
    /// Entries that are not a list of strings are skipped with a warning;
    /// one bad entry never discards the rest of the layer.
    pub fn from_document(document: &ConfigDocument) -> Self {
        let mut mapping = Self::new();
        for (action, value) in document.iter() {
            match parse_tokens(value) {
                Some(set) => {
                    mapping.bindings.insert(LogicalAction::new(action.as_str()), set);
                }
                None => {
                    tracing::warn!(
                        %action,
                        found = value_kind(value),
                        "Skipping binding that is not a list of token names"
                    );
                }
            }
        }
        mapping
    }

    /// Serialize back into a layer document.
    pub fn to_document(&self) -> ConfigDocument {
        let mut document = ConfigDocument::new();
        for (action, set) in &self.bindings {
            document.insert(action.as_str(), tokens_to_value(set));
        }
        document
    }

    pub fn get(&self, action: &LogicalAction) -> Option<&BindingSet> {
        self.bindings.get(action)
    }

    pub fn set(&mut self, action: LogicalAction, set: BindingSet) {
        self.bindings.insert(action, set);
    }

    pub fn with(mut self, action: &str, tokens: &[&str]) -> Self {
        self.set(
            LogicalAction::new(action),
            tokens.iter().map(InputToken::new).collect(),
        );
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LogicalAction, &BindingSet)> {
        self.bindings.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn parse_tokens(value: &Value) -> Option<BindingSet> {
    let items = value.as_array()?;
    let mut set = BindingSet::new();
    for item in items {
        set.insert(InputToken::new(item.as_str()?));
    }
    Some(set)
}

/// JSON list form of a binding set.
pub(crate) fn tokens_to_value(set: &BindingSet) -> Value {
    Value::Array(
        set.iter()
            .map(|t| Value::String(t.as_str().to_string()))
            .collect(),
    )
}
