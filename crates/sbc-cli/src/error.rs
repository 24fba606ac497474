//! Error types for sbc-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from sbc-config
    #[error(transparent)]
    Config(#[from] sbc_config::Error),

    /// Error from sbc-fs
    #[error(transparent)]
    Fs(#[from] sbc_fs::Error),

    /// Unparsable hardware probe or value argument
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
