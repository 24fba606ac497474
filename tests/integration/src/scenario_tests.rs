//! Scenario-based Integration Tests
//!
//! Each module drives the engine against a real on-disk layer tree and
//! checks one user-visible behavior end to end.

use sbc_config::settings::PathExpander;
use sbc_config::{
    BindingScope, Diagnostic, Engine, FileLayerSource, HardwareProfile, InputToken,
    LayerSelection, LogicalAction, SettingsResolver,
};
use sbc_fs::{JsonStore, LoadOutcome, NormalizedPath};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Builder for an on-disk layer tree
struct LayerTree {
    dir: TempDir,
    hardware: HardwareProfile,
    metadata: bool,
}

impl LayerTree {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            hardware: HardwareProfile::standard(),
            metadata: false,
        }
    }

    fn file(self, relative: &str, value: Value) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
        self
    }

    fn raw(self, relative: &str, text: &str) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        self
    }

    fn probe(mut self, probe: Value) -> Self {
        self.hardware.extend(HardwareProfile::from_probe(&probe));
        self
    }

    fn with_metadata(mut self) -> Self {
        self.metadata = true;
        self
    }

    fn open(&self, device: &str, os: &str) -> Engine<FileLayerSource> {
        self.try_open(device, os).unwrap()
    }

    fn try_open(&self, device: &str, os: &str) -> sbc_config::Result<Engine<FileLayerSource>> {
        let mut resolver = SettingsResolver::new(LayerSelection::new(device, os))
            .with_expander(PathExpander::fixed("/home/ark", HashMap::new()));
        if !self.metadata {
            resolver = resolver.without_metadata();
        }
        Engine::with_resolver(
            FileLayerSource::at(self.dir.path()),
            resolver,
            self.hardware.clone(),
        )
    }

    fn read(&self, relative: &str) -> LoadOutcome {
        JsonStore::new()
            .load(&NormalizedPath::new(self.dir.path().join(relative)))
            .unwrap()
    }
}

fn resolved_value(engine: &Engine<FileLayerSource>) -> Value {
    engine.resolved().document().clone().into_value()
}

// =============================================================================
// Scenario 1: Settings layering
// =============================================================================

mod s1_settings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn documented_four_layer_example() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({"a": 1, "b": {"x": 1}}))
            .file("config/devices/rg351.json", json!({"b": {"y": 2}}))
            .file("config/os_types/arkos.json", json!({}))
            .file("data/user/settings.json", json!({"b": {"x": 9}}));

        let engine = tree.open("rg351", "arkos");

        assert_eq!(resolved_value(&engine), json!({"a": 1, "b": {"x": 9, "y": 2}}));
    }

    #[test]
    fn missing_device_file_matches_empty_device_file() {
        let missing = LayerTree::new()
            .file("config/devices/default.json", json!({"display": {"fps": 30}}));
        let empty = LayerTree::new()
            .file("config/devices/default.json", json!({"display": {"fps": 30}}))
            .file("config/devices/rg351.json", json!({}));

        assert_eq!(
            resolved_value(&missing.open("rg351", "arkos")),
            resolved_value(&empty.open("rg351", "arkos"))
        );
    }

    #[test]
    fn null_override_replaces_instead_of_deleting() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({"audio": {"device": "hw:0", "volume": 5}}))
            .file("data/user/settings.json", json!({"audio": {"device": null}}));

        let engine = tree.open("desktop", "standard_linux");

        assert_eq!(engine.resolved().get("audio.device"), Some(&Value::Null));
        assert_eq!(engine.resolved().get("audio.volume"), Some(&json!(5)));
    }

    #[test]
    fn sequences_are_replaced_whole() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({"emulators": {"order": ["a", "b", "c"]}}))
            .file("config/os_types/arkos.json", json!({"emulators": {"order": ["z"]}}));

        let engine = tree.open("desktop", "arkos");

        assert_eq!(engine.resolved().get("emulators.order"), Some(&json!(["z"])));
    }

    #[test]
    fn malformed_user_layer_is_skipped_with_warning() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({"display": {"fps": 30}}))
            .raw("data/user/settings.json", "{\"display\": ");

        let engine = tree.open("desktop", "standard_linux");

        assert_eq!(engine.resolved().get("display.fps"), Some(&json!(30)));
        assert!(engine.diagnostics().iter().any(|d| matches!(
            d,
            Diagnostic::MalformedDocument { location, .. } if location == "user/settings.json"
        )));
    }

    #[test]
    fn missing_default_layer_aborts_startup() {
        let tree = LayerTree::new().file("config/devices/rg351.json", json!({"display": {}}));

        let err = tree.try_open("rg351", "arkos").err().unwrap();

        assert!(matches!(err, sbc_config::Error::MissingDefaultLayer { .. }));
    }

    #[test]
    fn home_references_expand_in_paths() {
        let tree = LayerTree::new().file(
            "config/devices/default.json",
            json!({"paths": {"roms": "~/roms", "extra": ["~/bios", "plain"]}, "name": "auto-save"}),
        );

        let engine = tree.open("desktop", "standard_linux");

        assert_eq!(engine.resolved().get("paths.roms"), Some(&json!("/home/ark/roms")));
        assert_eq!(
            engine.resolved().get("paths.extra"),
            Some(&json!(["/home/ark/bios", "plain"]))
        );
        assert_eq!(engine.resolved().get("name"), Some(&json!("auto-save")));
    }

    #[test]
    fn metadata_records_selection_and_probe() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({}))
            .probe(json!({"cpu": {"core_count": 4}}))
            .with_metadata();

        let engine = tree.open("rg351", "arkos");

        assert_eq!(engine.resolved().get("detected_device"), Some(&json!("rg351")));
        assert_eq!(engine.resolved().get("probed_hardware.cpu.core_count"), Some(&json!(4)));
    }
}

// =============================================================================
// Scenario 2: Placeholder substitution
// =============================================================================

mod s2_placeholders {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn auto_resolution_comes_from_probe() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({"display": {"resolution": "auto"}}))
            .probe(json!({"display": {"current_resolution": [640, 480]}}));

        let engine = tree.open("desktop", "standard_linux");

        assert_eq!(engine.resolved().get("display.resolution"), Some(&json!([640, 480])));
        assert_eq!(engine.resolved().unresolved_placeholders().count(), 0);
    }

    #[test]
    fn auto_without_probe_value_stays_literal() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({"display": {"resolution": "auto"}}));

        let engine = tree.open("desktop", "standard_linux");

        assert_eq!(engine.resolved().get("display.resolution"), Some(&json!("auto")));
        assert_eq!(
            engine.resolved().unresolved_placeholders().collect::<Vec<_>>(),
            vec!["display.resolution"]
        );
    }

    #[test]
    fn reprobe_fills_previously_unresolved_placeholder() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({"display": {"resolution": "auto"}}));
        let mut engine = tree.open("desktop", "standard_linux");

        engine
            .reprobe(HardwareProfile::standard().with("display.current_resolution", json!([1280, 720])))
            .unwrap();

        assert_eq!(engine.resolved().get("display.resolution"), Some(&json!([1280, 720])));
    }
}

// =============================================================================
// Scenario 3: Input resolution and contexts
// =============================================================================

mod s3_input {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree() -> LayerTree {
        LayerTree::new()
            .file("config/devices/default.json", json!({}))
            .file(
                "config/input_mappings/default.json",
                json!({"confirm": ["RETURN"], "select": ["BUTTON_A"], "cancel": ["ESCAPE"]}),
            )
            .file("config/input_mappings/rg351.json", json!({"confirm": ["BUTTON_A"]}))
            .file("data/input_overrides/device.json", json!({"confirm": []}))
            .file(
                "data/input_overrides/games/doom.json",
                json!({"confirm": ["BUTTON_A", "BUTTON_SOUTH"], "fire": ["BUTTON_RB"]}),
            )
    }

    #[test]
    fn context_set_replaces_device_set() {
        let tree = tree();
        let mut engine = tree.open("rg351", "arkos");
        engine.set_context(Some("doom"));

        let confirm = engine.input().map().bindings_for(&LogicalAction::new("confirm"));
        let names: Vec<&str> = confirm.iter().map(InputToken::as_str).collect();
        assert_eq!(names, vec!["BUTTON_A", "BUTTON_SOUTH"]);
    }

    #[test]
    fn shared_token_fires_every_action() {
        let tree = tree();
        let mut engine = tree.open("rg351", "arkos");

        assert_eq!(
            engine.classify(&InputToken::new("BUTTON_A")),
            vec![LogicalAction::new("confirm"), LogicalAction::new("select")]
        );
    }

    #[test]
    fn clearing_context_restores_device_user_map() {
        let tree = tree();
        let mut engine = tree.open("rg351", "arkos");
        let before = engine.input().map().clone();

        engine.set_context(Some("doom"));
        assert_ne!(engine.input().map(), &before);
        engine.set_context(None);

        assert_eq!(engine.input().map(), &before);
    }

    #[test]
    fn raw_controller_events_classify() {
        let tree = tree();
        let mut engine = tree.open("rg351", "arkos");
        let right_shoulder = InputToken::from_button_index(5);
        assert!(!engine.is_action_triggered(&"fire".into(), &right_shoulder));

        engine.set_context(Some("doom"));

        assert!(engine.is_action_triggered(&"fire".into(), &right_shoulder));
        assert!(engine.is_action_triggered(&"confirm".into(), &InputToken::from_button_index(0)));
        assert!(!engine.is_action_triggered(&"cancel".into(), &InputToken::from_hat(0, 1)));
    }
}

// =============================================================================
// Scenario 4: Override write-back
// =============================================================================

mod s4_persistence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_op_round_trip_preserves_structure() {
        let original = json!({"zeta": {"b": [3, 1], "a": null}, "alpha": "x"});
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({}))
            .file("data/user/settings.json", original.clone());

        let mut engine = tree.open("desktop", "standard_linux");
        engine.set_setting("alpha", json!("x")).unwrap();
        engine.flush().unwrap();

        assert_eq!(tree.read("data/user/settings.json"), LoadOutcome::Found(original));
    }

    #[test]
    fn bindings_survive_restart_in_their_scope() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({}))
            .file("config/input_mappings/default.json", json!({"menu": ["ESCAPE"]}));

        let mut engine = tree.open("desktop", "standard_linux");
        engine.set_context(Some("quake"));
        engine.record_binding(
            &"menu".into(),
            [InputToken::new("BUTTON_START")].into_iter().collect(),
            BindingScope::Context,
        );
        assert_eq!(engine.flush().unwrap(), 1);
        assert_eq!(tree.read("data/input_overrides/device.json"), LoadOutcome::Missing);

        let mut restarted = tree.open("desktop", "standard_linux");
        assert_eq!(restarted.classify(&InputToken::new("ESCAPE")), vec![LogicalAction::new("menu")]);
        restarted.set_context(Some("quake"));
        assert!(restarted.classify(&InputToken::new("ESCAPE")).is_empty());
        assert_eq!(
            restarted.classify(&InputToken::new("BUTTON_START")),
            vec![LogicalAction::new("menu")]
        );
    }
}

// =============================================================================
// Scenario 5: Independent engines
// =============================================================================

mod s5_isolation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn engines_do_not_share_context() {
        let tree = LayerTree::new()
            .file("config/devices/default.json", json!({}))
            .file("config/input_mappings/default.json", json!({"fire": ["SPACE"]}))
            .file("data/input_overrides/games/doom.json", json!({"fire": ["BUTTON_R1"]}));

        let mut first = tree.open("desktop", "standard_linux");
        let mut second = tree.open("desktop", "standard_linux");
        first.set_context(Some("doom"));

        assert_eq!(first.classify(&InputToken::new("BUTTON_R1")), vec![LogicalAction::new("fire")]);
        assert!(second.classify(&InputToken::new("BUTTON_R1")).is_empty());
        assert_eq!(second.context(), None);
    }
}
