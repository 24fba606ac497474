//! Resolved action table and reverse token index

use super::{BindingSet, InputMapping, InputToken, LogicalAction, layer::tokens_to_value};
use crate::{ConfigDocument, Diagnostic};
use std::collections::{BTreeMap, HashMap};

static EMPTY_SET: BindingSet = BindingSet::new();

/// The merged input map for one set of layers.
///
/// Holds both directions: action to tokens, and token to every action it
/// triggers. The reverse index is built once here so classification is a
/// single lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedInputMap {
    bindings: BTreeMap<LogicalAction, BindingSet>,
    reverse: HashMap<InputToken, Vec<LogicalAction>>,
}

/// Fold input layers in order, lowest precedence first.
///
/// For each action the highest layer with a non-empty set wins outright;
/// an empty or absent set inherits from below.
///
/// ```
/// use sbc_config::input::{InputMapping, build_map};
/// use sbc_config::{InputToken, LogicalAction};
///
/// let map = build_map(&[
///     InputMapping::new().with("confirm", &["RETURN"]),
///     InputMapping::new().with("confirm", &["BUTTON_A"]),
///     InputMapping::new(),
///     InputMapping::new().with("confirm", &["BUTTON_A", "BUTTON_SOUTH"]),
/// ]);
/// let confirm = map.bindings_for(&LogicalAction::new("confirm"));
/// assert_eq!(confirm.len(), 2);
/// assert!(!confirm.contains(&InputToken::new("RETURN")));
/// ```
pub fn build_map(layers: &[InputMapping]) -> ResolvedInputMap {
    let mut bindings: BTreeMap<LogicalAction, BindingSet> = BTreeMap::new();
    for layer in layers {
        for (action, set) in layer.iter() {
            if !set.is_empty() {
                bindings.insert(action.clone(), set.clone());
            }
        }
    }

    let mut reverse: HashMap<InputToken, Vec<LogicalAction>> = HashMap::new();
    for (action, set) in &bindings {
        for token in set {
            reverse.entry(token.clone()).or_default().push(action.clone());
        }
    }

    let map = ResolvedInputMap { bindings, reverse };
    for diagnostic in map.ambiguous_bindings() {
        diagnostic.emit();
    }
    map
}

impl ResolvedInputMap {
    /// Tokens bound to `action`; empty for unknown actions.
    pub fn bindings_for(&self, action: &LogicalAction) -> &BindingSet {
        self.bindings.get(action).unwrap_or(&EMPTY_SET)
    }

    /// Every action bound to `token`, in action-name order.
    pub fn classify(&self, token: &InputToken) -> &[LogicalAction] {
        self.reverse.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Union of the actions for several tokens from one physical event.
    pub fn classify_all<'a, I>(&self, tokens: I) -> Vec<LogicalAction>
    where
        I: IntoIterator<Item = &'a InputToken>,
    {
        let mut actions: Vec<LogicalAction> = Vec::new();
        for token in tokens {
            for action in self.classify(token) {
                if !actions.contains(action) {
                    actions.push(action.clone());
                }
            }
        }
        actions
    }

    /// Whether `token` triggers `action`.
    pub fn is_bound(&self, action: &LogicalAction, token: &InputToken) -> bool {
        self.bindings_for(action).contains(token)
    }

    /// Tokens that trigger more than one action, sorted by token.
    pub fn ambiguous_bindings(&self) -> Vec<Diagnostic> {
        let mut shared: Vec<(&InputToken, &Vec<LogicalAction>)> = self
            .reverse
            .iter()
            .filter(|(_, actions)| actions.len() > 1)
            .collect();
        shared.sort_by_key(|(token, _)| *token);

        shared
            .into_iter()
            .map(|(token, actions)| Diagnostic::AmbiguousBinding {
                token: token.clone(),
                actions: actions.clone(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LogicalAction, &BindingSet)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Action table as a JSON document, for display.
    pub fn to_document(&self) -> ConfigDocument {
        let mut document = ConfigDocument::new();
        for (action, set) in &self.bindings {
            document.insert(action.as_str(), tokens_to_value(set));
        }
        document
    }
}
