//! Hierarchical settings and input-mapping resolution for sbc handhelds
//!
//! This crate resolves the two precedence hierarchies behind the launcher:
//!
//! - **Settings**: Default, Device, OS and User documents are deep-merged,
//!   `"auto"` placeholders are filled from the probed [`HardwareProfile`],
//!   and home/environment references in strings are expanded.
//! - **Input**: Default, Device, User and Context binding tables are folded
//!   per action into a [`ResolvedInputMap`](input::ResolvedInputMap) with a
//!   reverse index for classifying physical tokens.
//!
//! # Architecture
//!
//! ```text
//!                 sbc-cli
//!                    |
//!               sbc-config
//!     (Engine, resolvers, OverrideStore)
//!                    |
//!        LayerSource / LayerSink
//!                    |
//!                 sbc-fs
//! ```
//!
//! Resolution never performs I/O. Documents come in through a
//! [`LayerSource`](source::LayerSource) and overrides go out through a
//! [`LayerSink`](source::LayerSink); [`FileLayerSource`](source::FileLayerSource)
//! implements both on top of `sbc-fs`.
//!
//! # Example
//!
//! ```
//! use sbc_config::{ConfigDocument, HardwareProfile, settings::resolve};
//! use serde_json::json;
//!
//! let default = ConfigDocument::from_value(json!({"display": {"resolution": "auto"}})).unwrap();
//! let hardware = HardwareProfile::new().with("display.resolution", json!([640, 480]));
//!
//! let resolved = resolve(&[default], &hardware);
//! assert_eq!(resolved.get("display.resolution"), Some(&json!([640, 480])));
//! ```

pub mod diagnostic;
pub mod document;
pub mod engine;
pub mod error;
pub mod hardware;
pub mod input;
pub mod merge;
pub mod overrides;
pub mod runtime;
pub mod settings;
pub mod source;

pub use diagnostic::Diagnostic;
pub use document::ConfigDocument;
pub use engine::Engine;
pub use error::{Error, Result};
pub use hardware::HardwareProfile;
pub use input::{BindingScope, BindingSet, InputResolver, InputToken, LogicalAction};
pub use merge::{merge, merge_all};
pub use overrides::{OverrideStore, WriteBack};
pub use runtime::RuntimeSettings;
pub use settings::{LayerSelection, ResolvedSettings, SettingsResolver};
pub use source::{DocumentKey, FileLayerSource, LayerSink, LayerSource, MemorySource};
