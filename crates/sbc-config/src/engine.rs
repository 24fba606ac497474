//! Engine facade tying the resolvers to one layer source
//!
//! [`Engine`] owns the override store and both resolved snapshots. Reads
//! go to the snapshots; mutations go to the store and trigger a rebuild.

use crate::input::{BindingScope, BindingSet, InputResolver, InputToken, LogicalAction};
use crate::settings::{LayerSelection, ResolvedSettings, SettingsResolver};
use crate::source::{LayerSink, LayerSource};
use crate::{Diagnostic, HardwareProfile, OverrideStore, Result, RuntimeSettings};
use serde_json::Value;

/// Settings and input resolution over a single source.
#[derive(Debug)]
pub struct Engine<S> {
    source: S,
    resolver: SettingsResolver,
    hardware: HardwareProfile,
    overrides: OverrideStore,
    settings: RuntimeSettings,
    input: InputResolver,
    diagnostics: Vec<Diagnostic>,
    context_diagnostic: Option<Diagnostic>,
}

impl<S: LayerSource + LayerSink> Engine<S> {
    /// Load every layer and run the first resolution passes.
    ///
    /// Fails only when the default settings layer is missing or malformed.
    pub fn start(source: S, selection: LayerSelection, hardware: HardwareProfile) -> Result<Self> {
        Self::with_resolver(source, SettingsResolver::new(selection), hardware)
    }

    pub fn with_resolver(
        source: S,
        resolver: SettingsResolver,
        hardware: HardwareProfile,
    ) -> Result<Self> {
        let (overrides, mut diagnostics) = OverrideStore::load(&source);
        let resolved = resolver.resolve(&source, &overrides, &hardware)?;
        diagnostics.extend_from_slice(resolved.diagnostics());

        let (settings, runtime_diag) = RuntimeSettings::load(resolved, &source);
        diagnostics.extend(runtime_diag);

        let input = InputResolver::load(&resolver.selection().device, &source, &overrides);
        diagnostics.extend_from_slice(input.diagnostics());

        tracing::info!(
            device = %resolver.selection().device,
            os = %resolver.selection().os,
            warnings = diagnostics.iter().filter(|d| d.is_warning()).count(),
            "Engine started"
        );

        Ok(Self {
            source,
            resolver,
            hardware,
            overrides,
            settings,
            input,
            diagnostics,
            context_diagnostic: None,
        })
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RuntimeSettings {
        &mut self.settings
    }

    pub fn resolved(&self) -> &ResolvedSettings {
        self.settings.resolved()
    }

    /// Re-run settings resolution against the current source and overrides.
    pub fn reload_settings(&mut self) -> Result<()> {
        let resolved = self
            .resolver
            .resolve(&self.source, &self.overrides, &self.hardware)?;
        self.settings.replace_resolved(resolved);
        Ok(())
    }

    /// Replace the hardware profile and re-resolve.
    pub fn reprobe(&mut self, hardware: HardwareProfile) -> Result<()> {
        self.hardware = hardware;
        self.reload_settings()
    }

    /// Set a user settings override and re-resolve.
    pub fn set_setting(&mut self, path: &str, value: Value) -> Result<()> {
        self.overrides.set_setting(path, value)?;
        self.reload_settings()
    }

    pub fn input(&self) -> &InputResolver {
        &self.input
    }

    /// Switch the input context. Any load problem replaces the previous
    /// context's in [`context_diagnostic`](Self::context_diagnostic).
    pub fn set_context(&mut self, context_id: Option<&str>) {
        self.context_diagnostic =
            self.input
                .set_context(context_id, &self.source, &mut self.overrides);
    }

    pub fn context(&self) -> Option<&str> {
        self.input.context()
    }

    pub fn record_binding(&mut self, action: &LogicalAction, tokens: BindingSet, scope: BindingScope) {
        self.input
            .record_binding(action, tokens, scope, &mut self.overrides);
    }

    /// Classify one token, picking up any bindings recorded since the last call.
    pub fn classify(&mut self, token: &InputToken) -> Vec<LogicalAction> {
        self.input.refresh(&self.overrides);
        self.input.classify(token).to_vec()
    }

    pub fn classify_all(&mut self, tokens: &[InputToken]) -> Vec<LogicalAction> {
        self.input.refresh(&self.overrides);
        self.input.classify_all(tokens)
    }

    pub fn is_action_triggered(&mut self, action: &LogicalAction, tokens: &[InputToken]) -> bool {
        self.input.refresh(&self.overrides);
        self.input.is_action_triggered(action, tokens)
    }

    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    pub fn hardware(&self) -> &HardwareProfile {
        &self.hardware
    }

    /// Diagnostics collected at startup.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Load problem for the active context, if any.
    pub fn context_diagnostic(&self) -> Option<&Diagnostic> {
        self.context_diagnostic.as_ref()
    }

    /// Write every dirty override document and the runtime document if it
    /// changed. Returns the number of documents written.
    pub fn flush(&mut self) -> Result<usize> {
        let mut written = self.overrides.flush(&mut self.source)?;
        self.overrides.prune_contexts(self.input.context());
        if self.settings.is_dirty() {
            self.settings.save(&mut self.source)?;
            written += 1;
        }
        Ok(written)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
