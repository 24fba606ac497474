//! Input commands: bindings, classify, bind

use colored::Colorize;
use sbc_config::source::is_valid_context_id;
use sbc_config::{BindingScope, BindingSet, InputToken, LogicalAction};

use crate::cli::LayerArgs;
use crate::context::open_engine;
use crate::error::{CliError, Result};

/// Reject context ids that cannot name an override document.
fn checked_context(context: Option<&str>) -> Result<Option<&str>> {
    match context {
        Some(id) if !is_valid_context_id(id) => Err(CliError::user(format!(
            "Invalid context {id:?}: use a single name without '/', '\\' or '..'"
        ))),
        _ => Ok(context),
    }
}

/// Print every resolved action and its tokens.
pub fn run_bindings(args: &LayerArgs, context: Option<&str>) -> Result<()> {
    let context = checked_context(context)?;
    let mut engine = open_engine(args)?;
    engine.set_context(context);

    let map = engine.input().map();
    if map.is_empty() {
        println!("{}", "No bindings".dimmed());
        return Ok(());
    }

    let width = map.iter().map(|(a, _)| a.as_str().len()).max().unwrap_or(0);
    for (action, tokens) in map.iter() {
        let names: Vec<&str> = tokens.iter().map(InputToken::as_str).collect();
        println!("{:width$}  {}", action.as_str().cyan(), names.join(", "));
    }
    Ok(())
}

/// Print the actions each token triggers.
pub fn run_classify(args: &LayerArgs, tokens: &[String], context: Option<&str>) -> Result<()> {
    let context = checked_context(context)?;
    let mut engine = open_engine(args)?;
    engine.set_context(context);

    for raw in tokens {
        let token = InputToken::new(raw);
        let actions = engine.classify(&token);
        if actions.is_empty() {
            println!("{}  {}", token, "(unbound)".dimmed());
        } else {
            let names: Vec<&str> = actions.iter().map(LogicalAction::as_str).collect();
            println!("{}  {}", token, names.join(", ").green());
        }
    }
    Ok(())
}

/// Record a binding override and save it.
pub fn run_bind(
    args: &LayerArgs,
    action: &str,
    tokens: &[String],
    scope: BindingScope,
    context: Option<&str>,
) -> Result<()> {
    if scope == BindingScope::Context && context.is_none() {
        return Err(CliError::user("--scope context needs --context <ID>"));
    }

    let context = checked_context(context)?;
    let mut engine = open_engine(args)?;
    engine.set_context(context);

    let action = LogicalAction::new(action);
    let set: BindingSet = tokens.iter().map(InputToken::new).collect();
    let names: Vec<String> = set.iter().map(ToString::to_string).collect();

    engine.record_binding(&action, set, scope);
    engine.flush()?;

    let target = match context {
        Some(id) if scope == BindingScope::Context => format!("context {id}"),
        _ => scope.to_string(),
    };
    println!(
        "{} {} to {} ({})",
        "Bound".green().bold(),
        action.as_str().cyan(),
        names.join(", "),
        target
    );
    Ok(())
}
