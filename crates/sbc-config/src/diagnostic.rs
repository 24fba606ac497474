//! Recoverable conditions observed during a resolution pass

use crate::input::{InputToken, LogicalAction};
use std::fmt;

/// A non-fatal condition recorded while resolving.
///
/// Every diagnostic is recovered locally: the affected layer becomes an
/// empty document, or the placeholder stays literal. Hosts can inspect
/// the list to surface degraded-functionality notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A layer document did not exist and was treated as empty
    MissingLayer { layer: String, location: String },

    /// A layer document could not be parsed and was treated as empty
    MalformedDocument {
        layer: String,
        location: String,
        message: String,
    },

    /// An `"auto"` value had no matching hardware profile entry
    UnresolvedPlaceholder { path: String },

    /// A context id that cannot name an override document; the Context
    /// layer stays empty
    InvalidContext { context: String },

    /// One token is bound to several actions; all of them fire
    AmbiguousBinding {
        token: InputToken,
        actions: Vec<LogicalAction>,
    },
}

impl Diagnostic {
    /// Log this diagnostic at its level.
    pub fn emit(&self) {
        match self {
            Self::MissingLayer { layer, location } => {
                tracing::info!(%layer, %location, "Layer document missing, using empty layer");
            }
            Self::MalformedDocument {
                layer,
                location,
                message,
            } => {
                tracing::warn!(%layer, %location, %message, "Malformed layer document, using empty layer");
            }
            Self::UnresolvedPlaceholder { path } => {
                tracing::warn!(%path, "No hardware value for auto placeholder");
            }
            Self::InvalidContext { context } => {
                tracing::warn!(%context, "Invalid context id, using empty context layer");
            }
            Self::AmbiguousBinding { token, actions } => {
                tracing::debug!(%token, ?actions, "Token bound to several actions");
            }
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::MalformedDocument { .. }
                | Self::UnresolvedPlaceholder { .. }
                | Self::InvalidContext { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLayer { layer, location } => {
                write!(f, "{layer} layer missing at {location}")
            }
            Self::MalformedDocument {
                layer,
                location,
                message,
            } => write!(f, "{layer} layer at {location} is malformed: {message}"),
            Self::UnresolvedPlaceholder { path } => {
                write!(f, "{path} is \"auto\" but no hardware value was probed")
            }
            Self::InvalidContext { context } => {
                write!(f, "context id {context:?} is not a single path segment")
            }
            Self::AmbiguousBinding { token, actions } => {
                let names: Vec<&str> = actions.iter().map(LogicalAction::as_str).collect();
                write!(f, "{token} triggers {}", names.join(", "))
            }
        }
    }
}
