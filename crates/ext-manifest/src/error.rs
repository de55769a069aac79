//! Error types for ext-manifest

use std::path::PathBuf;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading manifests
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A manifest is not valid JSON or has a malformed `dependencies` field.
    #[error("failed to parse manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ManifestParse {
            path: path.into(),
            message: source.to_string(),
        }
    }
}
