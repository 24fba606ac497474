//! Context-aware input resolution

use super::{BindingSet, InputLayer, InputMapping, InputToken, LogicalAction, ResolvedInputMap, build_map};
use crate::source::{DocumentKey, LayerSource, load_layer};
use crate::{Diagnostic, OverrideStore};
use std::fmt;

/// Where [`InputResolver::record_binding`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingScope {
    /// The device-wide user override
    #[default]
    User,
    /// The active context's override
    Context,
}

impl BindingScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Context => "context",
        }
    }
}

impl fmt::Display for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the shipped input layers and the current context, and keeps a
/// [`ResolvedInputMap`] built from them plus the override store.
///
/// Each resolver owns its own current context; separate instances never
/// observe each other's state.
#[derive(Debug, Clone)]
pub struct InputResolver {
    default_layer: InputMapping,
    device_layer: InputMapping,
    context: Option<String>,
    map: ResolvedInputMap,
    diagnostics: Vec<Diagnostic>,
    stale: bool,
}

impl InputResolver {
    /// Resolver over already-parsed Default and Device layers, with no
    /// context set. Call [`rebuild`](Self::rebuild) before classifying.
    pub fn new(default_layer: InputMapping, device_layer: InputMapping) -> Self {
        Self {
            default_layer,
            device_layer,
            context: None,
            map: ResolvedInputMap::default(),
            diagnostics: Vec::new(),
            stale: true,
        }
    }

    /// Load the shipped layers for `device` and build the initial map.
    ///
    /// Missing or malformed input layers degrade to empty layers.
    pub fn load(device: &str, source: &dyn LayerSource, store: &OverrideStore) -> Self {
        let (default_doc, default_diag) =
            load_layer(source, &DocumentKey::input_default(), InputLayer::Default.as_str());
        let (device_doc, device_diag) =
            load_layer(source, &DocumentKey::input_device(device), InputLayer::Device.as_str());

        let mut resolver = Self::new(
            InputMapping::from_document(&default_doc),
            InputMapping::from_document(&device_doc),
        );
        resolver.rebuild(store);
        resolver.diagnostics.extend(default_diag);
        resolver.diagnostics.extend(device_diag);
        resolver
    }

    /// The four layers in merge order.
    pub fn layers(&self, store: &OverrideStore) -> [InputMapping; 4] {
        let context = self
            .context
            .as_deref()
            .and_then(|id| store.context(id))
            .map(InputMapping::from_document)
            .unwrap_or_default();

        [
            self.default_layer.clone(),
            self.device_layer.clone(),
            InputMapping::from_document(store.input_user()),
            context,
        ]
    }

    /// Rebuild the resolved map from the current layers.
    pub fn rebuild(&mut self, store: &OverrideStore) {
        self.map = build_map(&self.layers(store));
        self.stale = false;
        tracing::debug!(
            actions = self.map.len(),
            context = ?self.context,
            "Rebuilt input map"
        );
    }

    /// Rebuild only if a binding was recorded since the last build.
    pub fn refresh(&mut self, store: &OverrideStore) {
        if self.stale {
            self.rebuild(store);
        }
    }

    /// Switch the Context layer and rebuild.
    ///
    /// The context's override document is loaded through `store`; a context
    /// without one, or with an id that cannot name a document, contributes
    /// an empty layer. `None` clears the Context layer. Cached documents of
    /// contexts left behind are released unless they hold unsaved bindings.
    ///
    /// Returns the load problem for the new context, if any.
    pub fn set_context(
        &mut self,
        context_id: Option<&str>,
        source: &dyn LayerSource,
        store: &mut OverrideStore,
    ) -> Option<Diagnostic> {
        let diagnostic = context_id.and_then(|id| store.load_context(id, source));
        store.prune_contexts(context_id);
        self.context = context_id.map(str::to_string);
        tracing::info!(context = ?self.context, "Input context changed");
        self.rebuild(store);
        diagnostic
    }

    /// Record a binding override in `scope`.
    ///
    /// The map is not rebuilt here; it is marked stale and the next
    /// [`refresh`](Self::refresh) picks the change up. A context-scoped
    /// binding with no active context goes to the user scope instead.
    pub fn record_binding(
        &mut self,
        action: &LogicalAction,
        tokens: BindingSet,
        scope: BindingScope,
        store: &mut OverrideStore,
    ) {
        let context = match (scope, self.context.as_deref()) {
            (BindingScope::User, _) => None,
            (BindingScope::Context, Some(id)) => Some(id),
            (BindingScope::Context, None) => {
                tracing::warn!(%action, "No active context, recording binding in user scope");
                None
            }
        };
        store.record_binding(context, action, &tokens);
        self.stale = true;
    }

    /// Actions bound to `token` in the current map.
    pub fn classify(&self, token: &InputToken) -> &[LogicalAction] {
        self.map.classify(token)
    }

    /// Actions bound to any token of one physical event.
    pub fn classify_all(&self, tokens: &[InputToken]) -> Vec<LogicalAction> {
        self.map.classify_all(tokens)
    }

    /// Whether any of `tokens` triggers `action`.
    pub fn is_action_triggered(&self, action: &LogicalAction, tokens: &[InputToken]) -> bool {
        tokens.iter().any(|token| self.map.is_bound(action, token))
    }

    pub fn map(&self) -> &ResolvedInputMap {
        &self.map
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Whether bindings were recorded since the map was last built.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Problems loading the shipped Default and Device layers.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
