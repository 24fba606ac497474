//! Settings commands: resolve, get, set

use colored::Colorize;
use serde_json::Value;

use crate::cli::LayerArgs;
use crate::context::open_engine;
use crate::error::{CliError, Result};

/// Print the resolved settings, or one value of them.
pub fn run_resolve(args: &LayerArgs, key: Option<&str>) -> Result<()> {
    let engine = open_engine(args)?;
    let resolved = engine.resolved();
    let value = match key {
        Some(key) => resolved
            .get(key)
            .cloned()
            .ok_or_else(|| CliError::user(format!("No setting at {key}")))?,
        None => resolved.document().clone().into_value(),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Print one runtime setting.
pub fn run_get(args: &LayerArgs, key: &str) -> Result<()> {
    let engine = open_engine(args)?;
    let value = engine
        .settings()
        .get(key)
        .ok_or_else(|| CliError::user(format!("No setting at {key}")))?;
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Set a runtime setting and save the runtime document.
pub fn run_set(args: &LayerArgs, key: &str, raw: &str) -> Result<()> {
    let mut engine = open_engine(args)?;
    let value = parse_value(raw);

    engine.settings_mut().set(key, value.clone())?;
    engine.flush()?;

    println!("{} {} = {}", "Set".green().bold(), key.cyan(), value);
    Ok(())
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
