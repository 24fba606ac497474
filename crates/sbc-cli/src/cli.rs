//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand, ValueEnum};
use sbc_config::BindingScope;
use sbc_config::settings::{DEFAULT_DEVICE, DEFAULT_OS};
use std::path::PathBuf;

/// sbc - Inspect and edit layered handheld settings and input bindings
#[derive(Parser, Debug)]
#[command(name = "sbc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub layers: LayerArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the layer documents live and which ones to pick.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LayerArgs {
    /// Root holding config/ and data/ (defaults to ~/.game_manager)
    #[arg(long, global = true, env = "SBC_ROOT")]
    pub root: Option<PathBuf>,

    /// Device layer identifier
    #[arg(long, global = true, env = "DEVICE_TYPE", default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// OS layer identifier
    #[arg(long, global = true, env = "OS_TYPE", default_value = DEFAULT_OS)]
    pub os: String,

    /// JSON file with probed hardware values (nested objects)
    #[arg(long, global = true)]
    pub hardware: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved settings document
    ///
    /// Examples:
    ///   sbc resolve                        # Whole document
    ///   sbc resolve --key display.fps      # One value
    Resolve {
        /// Dot path to print instead of the whole document
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Print the resolved input bindings
    Bindings {
        /// Context (game) whose overrides apply
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Show which actions the given tokens trigger
    ///
    /// Examples:
    ///   sbc classify RETURN BUTTON_A
    ///   sbc classify BUTTON_R1 --context doom
    Classify {
        /// Physical input token names
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Context (game) whose overrides apply
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Bind an action to tokens and save the override
    ///
    /// Examples:
    ///   sbc bind confirm BUTTON_A RETURN
    ///   sbc bind fire BUTTON_R1 --scope context --context doom
    Bind {
        /// Logical action name
        action: String,

        /// Physical input token names
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Which override document to write
        #[arg(short, long, value_enum, default_value_t = ScopeArg::User)]
        scope: ScopeArg,

        /// Context (game) for context-scoped bindings
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Print a runtime setting (runtime value first, then resolved)
    Get {
        /// Dot path, e.g. display.fps
        key: String,
    },

    /// Set a runtime setting and save it
    ///
    /// The value is parsed as JSON; anything that does not parse is stored
    /// as a string.
    Set {
        /// Dot path, e.g. display.fps
        key: String,

        /// New value
        value: String,
    },
}

/// Override scope for `bind`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeArg {
    User,
    Context,
}

impl From<ScopeArg> for BindingScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::User => BindingScope::User,
            ScopeArg::Context => BindingScope::Context,
        }
    }
}
