//! Filesystem persistence for the sbc settings engine
//!
//! Provides normalized path handling, atomic locked writes and a JSON
//! document store that tells a missing file apart from an unparsable one.

pub mod error;
pub mod io;
pub mod path;
pub mod store;

pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use store::{JsonStore, LoadOutcome};
