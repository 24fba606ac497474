//! Logical actions, physical input tokens and binding sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantic input event name such as `confirm` or `menu`.
///
/// The action set is open; unknown actions simply have no bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalAction(String);

impl LogicalAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalAction {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LogicalAction {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which family a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenNamespace {
    Keyboard,
    Controller,
}

const CONTROLLER_PREFIXES: [&str; 3] = ["BUTTON_", "DPAD_", "AXIS_"];

/// Semantic names for the common controller button indices.
const BUTTON_NAMES: [&[&str]; 14] = [
    &["BUTTON_A", "BUTTON_SOUTH"],
    &["BUTTON_B", "BUTTON_EAST"],
    &["BUTTON_X", "BUTTON_WEST"],
    &["BUTTON_Y", "BUTTON_NORTH"],
    &["BUTTON_L1", "BUTTON_LB"],
    &["BUTTON_R1", "BUTTON_RB"],
    &["BUTTON_SELECT", "BUTTON_BACK"],
    &["BUTTON_START"],
    &["BUTTON_L3"],
    &["BUTTON_R3"],
    &["BUTTON_L2", "BUTTON_LT"],
    &["BUTTON_R2", "BUTTON_RT"],
    &["BUTTON_MENU"],
    &["BUTTON_MENU"],
];

/// A normalized name for one physical input signal.
///
/// Tokens are stored upper-case, so `return` and `RETURN` are the same key.
/// Controller tokens start with `BUTTON_`, `DPAD_` or `AXIS_`; everything
/// else is a keyboard key name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct InputToken(String);

impl InputToken {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> TokenNamespace {
        if CONTROLLER_PREFIXES.iter().any(|p| self.0.starts_with(p)) {
            TokenNamespace::Controller
        } else {
            TokenNamespace::Keyboard
        }
    }

    /// Tokens for a raw controller button index.
    ///
    /// Known indices yield their semantic names; every index also yields the
    /// numeric fallback `BUTTON_{index}`.
    ///
    /// ```
    /// use sbc_config::InputToken;
    ///
    /// let names: Vec<String> = InputToken::from_button_index(0)
    ///     .iter()
    ///     .map(|t| t.to_string())
    ///     .collect();
    /// assert_eq!(names, ["BUTTON_A", "BUTTON_SOUTH", "BUTTON_0"]);
    /// ```
    pub fn from_button_index(index: u32) -> Vec<InputToken> {
        let mut tokens: Vec<InputToken> = usize::try_from(index)
            .ok()
            .and_then(|i| BUTTON_NAMES.get(i))
            .map(|names| names.iter().map(|n| Self((*n).to_string())).collect())
            .unwrap_or_default();
        tokens.push(Self(format!("BUTTON_{index}")));
        tokens
    }

    /// Tokens for a d-pad hat position; `(0, 0)` yields none.
    pub fn from_hat(x: i8, y: i8) -> Vec<InputToken> {
        let mut tokens = Vec::new();
        match y {
            1 => tokens.push(Self("DPAD_UP".to_string())),
            -1 => tokens.push(Self("DPAD_DOWN".to_string())),
            _ => {}
        }
        match x {
            -1 => tokens.push(Self("DPAD_LEFT".to_string())),
            1 => tokens.push(Self("DPAD_RIGHT".to_string())),
            _ => {}
        }
        tokens
    }
}

impl fmt::Display for InputToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for InputToken {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for InputToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<InputToken> for String {
    fn from(token: InputToken) -> Self {
        token.0
    }
}

/// An ordered set of tokens bound to one action.
///
/// Insertion order is kept and duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<InputToken>", into = "Vec<InputToken>")]
pub struct BindingSet(Vec<InputToken>);

impl BindingSet {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a token; returns false if it was already present.
    pub fn insert(&mut self, token: InputToken) -> bool {
        if self.0.contains(&token) {
            return false;
        }
        self.0.push(token);
        true
    }

    pub fn contains(&self, token: &InputToken) -> bool {
        self.0.contains(token)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InputToken> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[InputToken] {
        &self.0
    }
}

impl FromIterator<InputToken> for BindingSet {
    fn from_iter<T: IntoIterator<Item = InputToken>>(iter: T) -> Self {
        let mut set = Self::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl From<Vec<InputToken>> for BindingSet {
    fn from(tokens: Vec<InputToken>) -> Self {
        tokens.into_iter().collect()
    }
}

impl From<BindingSet> for Vec<InputToken> {
    fn from(set: BindingSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a BindingSet {
    type Item = &'a InputToken;
    type IntoIter = std::slice::Iter<'a, InputToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("return", "RETURN", TokenNamespace::Keyboard)]
    #[case(" escape ", "ESCAPE", TokenNamespace::Keyboard)]
    #[case("button_south", "BUTTON_SOUTH", TokenNamespace::Controller)]
    #[case("DPAD_UP", "DPAD_UP", TokenNamespace::Controller)]
    fn tokens_normalize_case(
        #[case] raw: &str,
        #[case] expected: &str,
        #[case] namespace: TokenNamespace,
    ) {
        let token = InputToken::new(raw);
        assert_eq!(token.as_str(), expected);
        assert_eq!(token.namespace(), namespace);
    }

    #[test]
    fn unknown_button_index_yields_only_numeric_name() {
        assert_eq!(InputToken::from_button_index(42), vec![InputToken::new("BUTTON_42")]);
    }

    #[test]
    fn menu_has_two_physical_indices() {
        assert!(InputToken::from_button_index(12).contains(&InputToken::new("BUTTON_MENU")));
        assert!(InputToken::from_button_index(13).contains(&InputToken::new("BUTTON_MENU")));
    }

    #[test]
    fn hat_diagonal_yields_both_directions() {
        assert_eq!(
            InputToken::from_hat(1, 1),
            vec![InputToken::new("DPAD_UP"), InputToken::new("DPAD_RIGHT")]
        );
        assert!(InputToken::from_hat(0, 0).is_empty());
    }

    #[test]
    fn binding_set_drops_duplicates_keeping_order() {
        let set: BindingSet = ["BUTTON_A", "RETURN", "button_a"]
            .into_iter()
            .map(InputToken::new)
            .collect();
        let names: Vec<&str> = set.iter().map(InputToken::as_str).collect();
        assert_eq!(names, vec!["BUTTON_A", "RETURN"]);
    }

    #[test]
    fn binding_set_deserializes_from_json_list() {
        let set: BindingSet = serde_json::from_str(r#"["return", "BUTTON_A"]"#).unwrap();
        assert_eq!(set.as_slice(), &[InputToken::new("RETURN"), InputToken::new("BUTTON_A")]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["RETURN","BUTTON_A"]"#);
    }
}
