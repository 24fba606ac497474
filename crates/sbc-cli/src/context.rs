//! Engine construction from command-line layer arguments

use crate::cli::LayerArgs;
use crate::error::{CliError, Result};
use sbc_config::{Engine, FileLayerSource, HardwareProfile, LayerSelection};
use sbc_fs::{JsonStore, LoadOutcome, NormalizedPath};
use std::path::Path;

/// Pick the layer source: `--root` if given, else `~/.game_manager`.
pub fn layer_source(args: &LayerArgs) -> Result<FileLayerSource> {
    match &args.root {
        Some(root) => Ok(FileLayerSource::at(root)),
        None => FileLayerSource::default_location()
            .ok_or_else(|| CliError::user("No home directory found; pass --root")),
    }
}

/// Load a probe file into a profile with the standard aliases.
pub fn hardware_profile(path: Option<&Path>) -> Result<HardwareProfile> {
    let mut profile = HardwareProfile::standard();
    let Some(path) = path else {
        return Ok(profile);
    };

    let path = NormalizedPath::new(path);
    match JsonStore::new().load(&path)? {
        LoadOutcome::Found(probe) => {
            profile.extend(HardwareProfile::from_probe(&probe));
            tracing::debug!(%path, values = profile.len(), "Loaded hardware probe");
            Ok(profile)
        }
        LoadOutcome::Missing => Err(CliError::user(format!("Hardware probe not found: {path}"))),
        LoadOutcome::Malformed { message } => Err(CliError::user(format!(
            "Hardware probe {path} is not valid JSON: {message}"
        ))),
    }
}

/// Start an engine for the selected layers.
pub fn open_engine(args: &LayerArgs) -> Result<Engine<FileLayerSource>> {
    let source = layer_source(args)?;
    let hardware = hardware_profile(args.hardware.as_deref())?;
    let selection = LayerSelection::new(&args.device, &args.os);

    tracing::debug!(
        config = %source.config_dir(),
        data = %source.data_dir(),
        device = %selection.device,
        os = %selection.os,
        "Opening layer tree"
    );
    Ok(Engine::start(source, selection, hardware)?)
}
