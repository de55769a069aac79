//! Error types for ext-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end a CLI invocation with exit status 1
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Manifest(#[from] ext_manifest::Error),

    #[error(transparent)]
    Catalog(#[from] ext_catalog::Error),

    #[error(transparent)]
    Resolve(#[from] ext_resolve::Error),

    #[error(transparent)]
    Build(#[from] ext_build::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
