//! User-writable override documents
//!
//! The [`OverrideStore`] holds the highest-precedence layers in memory:
//! settings overrides, input overrides, and per-context input overrides.
//! Mutations mark a scope dirty; [`OverrideStore::flush`] hands every dirty
//! document to a [`LayerSink`] and clears the flag.

use crate::input::{BindingSet, LogicalAction, layer::tokens_to_value};
use crate::source::{DocumentKey, LayerSink, LayerSource, is_valid_context_id, load_layer};
use crate::{ConfigDocument, Diagnostic, Result};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
struct Tracked {
    document: ConfigDocument,
    dirty: bool,
}

impl Tracked {
    fn clean(document: ConfigDocument) -> Self {
        Self {
            document,
            dirty: false,
        }
    }
}

/// A document waiting to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBack {
    pub key: DocumentKey,
    pub document: ConfigDocument,
}

/// In-memory override layers with dirty tracking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideStore {
    settings: Tracked,
    input_user: Tracked,
    contexts: BTreeMap<String, Tracked>,
}

impl OverrideStore {
    /// Empty store; nothing is dirty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the settings and input user overrides from a source.
    ///
    /// Missing or malformed documents start empty. Context overrides are
    /// loaded on demand with [`load_context`](Self::load_context).
    pub fn load(source: &dyn LayerSource) -> (Self, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();

        let (settings, diagnostic) = load_layer(source, &DocumentKey::user_settings(), "user");
        diagnostics.extend(diagnostic);
        let (input_user, diagnostic) = load_layer(source, &DocumentKey::input_user(), "input user");
        diagnostics.extend(diagnostic);

        let store = Self {
            settings: Tracked::clean(settings),
            input_user: Tracked::clean(input_user),
            contexts: BTreeMap::new(),
        };
        (store, diagnostics)
    }

    /// Load a context's override document unless it is already held.
    ///
    /// An in-memory copy always wins over the source so unsaved bindings
    /// survive a context switch. An invalid id is never looked up.
    pub fn load_context(&mut self, context_id: &str, source: &dyn LayerSource) -> Option<Diagnostic> {
        if !is_valid_context_id(context_id) {
            let diagnostic = Diagnostic::InvalidContext {
                context: context_id.to_string(),
            };
            diagnostic.emit();
            return Some(diagnostic);
        }
        if self.contexts.contains_key(context_id) {
            return None;
        }
        let (document, diagnostic) = load_layer(
            source,
            &DocumentKey::input_context(context_id),
            "input context",
        );
        self.contexts
            .insert(context_id.to_string(), Tracked::clean(document));
        diagnostic
    }

    /// Drop cached context documents that have no unsaved bindings, except
    /// `keep`.
    pub fn prune_contexts(&mut self, keep: Option<&str>) {
        self.contexts
            .retain(|id, tracked| tracked.dirty || Some(id.as_str()) == keep);
    }

    pub fn settings(&self) -> &ConfigDocument {
        &self.settings.document
    }

    pub fn input_user(&self) -> &ConfigDocument {
        &self.input_user.document
    }

    pub fn context(&self, context_id: &str) -> Option<&ConfigDocument> {
        self.contexts.get(context_id).map(|t| &t.document)
    }

    /// Set a settings override at a dot path.
    pub fn set_setting(&mut self, path: &str, value: Value) -> Result<()> {
        self.settings.document.set_path(path, value)?;
        self.settings.dirty = true;
        tracing::debug!(%path, "Recorded settings override");
        Ok(())
    }

    /// Record a binding in the user scope (`context_id = None`) or in a
    /// context scope.
    ///
    /// The context document should have been loaded first; otherwise a new
    /// empty one is started and will replace whatever the sink holds.
    /// Bindings for an invalid context id are dropped.
    pub fn record_binding(
        &mut self,
        context_id: Option<&str>,
        action: &LogicalAction,
        tokens: &BindingSet,
    ) {
        let tracked = match context_id {
            Some(id) if !is_valid_context_id(id) => {
                tracing::warn!(context = %id, %action, "Dropping binding for invalid context id");
                return;
            }
            Some(id) => self.contexts.entry(id.to_string()).or_default(),
            None => &mut self.input_user,
        };
        tracked
            .document
            .insert(action.as_str(), tokens_to_value(tokens));
        tracked.dirty = true;
        tracing::debug!(%action, context = ?context_id, "Recorded binding override");
    }

    pub fn is_dirty(&self) -> bool {
        self.settings.dirty || self.input_user.dirty || self.contexts.values().any(|t| t.dirty)
    }

    /// Dirty documents in a stable order: settings, input user, contexts by id.
    pub fn pending(&self) -> Vec<WriteBack> {
        self.tracked()
            .filter(|(_, tracked)| tracked.dirty)
            .map(|(key, tracked)| WriteBack {
                key,
                document: tracked.document.clone(),
            })
            .collect()
    }

    /// Persist every dirty document and clear its flag.
    ///
    /// Stops at the first sink error; scopes already written stay clean and
    /// the failing scope stays dirty. Returns the number written.
    pub fn flush(&mut self, sink: &mut dyn LayerSink) -> Result<usize> {
        let mut written = 0;

        if self.settings.dirty {
            sink.store(&DocumentKey::user_settings(), &self.settings.document)?;
            self.settings.dirty = false;
            written += 1;
        }
        if self.input_user.dirty {
            sink.store(&DocumentKey::input_user(), &self.input_user.document)?;
            self.input_user.dirty = false;
            written += 1;
        }
        for (id, tracked) in self.contexts.iter_mut().filter(|(_, t)| t.dirty) {
            sink.store(&DocumentKey::input_context(id), &tracked.document)?;
            tracked.dirty = false;
            written += 1;
        }

        if written > 0 {
            tracing::info!(written, "Flushed override documents");
        }
        Ok(written)
    }

    fn tracked(&self) -> impl Iterator<Item = (DocumentKey, &Tracked)> {
        [
            (DocumentKey::user_settings(), &self.settings),
            (DocumentKey::input_user(), &self.input_user),
        ]
        .into_iter()
        .chain(
            self.contexts
                .iter()
                .map(|(id, tracked)| (DocumentKey::input_context(id), tracked)),
        )
    }
}
