//! Error types for sbc-config

/// Result type for sbc-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a resolution pass or a mutation.
///
/// Absent or unparsable non-default layers are not errors; they surface as
/// [`Diagnostic`](crate::Diagnostic) values on the resolution result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The default settings layer is the baseline; nothing resolves without it
    #[error("Default {kind} layer not found at {location}")]
    MissingDefaultLayer {
        kind: &'static str,
        location: String,
    },

    #[error("Default {kind} layer at {location} is malformed: {message}")]
    MalformedDefaultLayer {
        kind: &'static str,
        location: String,
        message: String,
    },

    #[error("Document root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Invalid key path: {path:?}")]
    InvalidKeyPath { path: String },

    #[error("Cannot set {path}: {segment} is not a mapping")]
    PathConflict { path: String, segment: String },

    #[error(transparent)]
    Fs(#[from] sbc_fs::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
