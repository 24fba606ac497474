//! Input-mapping hierarchy resolution
//!
//! Bindings come from four layers, later layers winning per action:
//!
//! 1. **Default** - `input_mappings/default.json`
//! 2. **Device** - `input_mappings/{device}.json`
//! 3. **User** - the input override document
//! 4. **Context** - the active context's override document, if any
//!
//! A layer that binds an action to a non-empty token list replaces the
//! lower layers' list for that action outright.

pub(crate) mod layer;
mod map;
mod resolver;
mod token;

pub use layer::{InputLayer, InputMapping};
pub use map::{ResolvedInputMap, build_map};
pub use resolver::{BindingScope, InputResolver};
pub use token::{BindingSet, InputToken, LogicalAction, TokenNamespace};
