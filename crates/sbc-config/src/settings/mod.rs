//! Settings hierarchy resolution
//!
//! Settings are merged from four layers, later layers winning:
//!
//! 1. **Default** - `devices/default.json` (required)
//! 2. **Device** - `devices/{device}.json`
//! 3. **OS** - `os_types/{os}.json`
//! 4. **User** - the settings override document
//!
//! The merged document then has `"auto"` placeholders replaced from the
//! [`HardwareProfile`](crate::HardwareProfile) and home/environment
//! references in string leaves expanded.

mod expand;
mod layer;
mod placeholder;
mod resolver;

pub use expand::PathExpander;
pub use layer::{DEFAULT_DEVICE, DEFAULT_OS, LayerSelection, SettingsLayer};
pub use placeholder::{AUTO, Slot, substitute_placeholders};
pub use resolver::{ResolvedSettings, SettingsResolver, resolve, resolve_with};
