//! sbc CLI
//!
//! Inspect and edit the layered settings and input bindings of a handheld.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, LayerArgs};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(&cli.layers, cmd),
        None => {
            println!("{} handheld settings and input bindings", "sbc".green().bold());
            println!();
            println!("Run {} for available commands.", "sbc --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr so command output on stdout stays machine-readable.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_err() {
        eprintln!("{}: tracing already initialised", "warning".yellow());
    }
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(layers: &LayerArgs, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve { key } => commands::run_resolve(layers, key.as_deref()),
        Commands::Bindings { context } => commands::run_bindings(layers, context.as_deref()),
        Commands::Classify { tokens, context } => {
            commands::run_classify(layers, &tokens, context.as_deref())
        }
        Commands::Bind {
            action,
            tokens,
            scope,
            context,
        } => commands::run_bind(layers, &action, &tokens, scope.into(), context.as_deref()),
        Commands::Get { key } => commands::run_get(layers, &key),
        Commands::Set { key, value } => commands::run_set(layers, &key, &value),
    }
}
