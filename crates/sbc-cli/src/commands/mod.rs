//! Command implementations for sbc-cli

pub mod input;
pub mod settings;

pub use input::{run_bind, run_bindings, run_classify};
pub use settings::{run_get, run_resolve, run_set};
