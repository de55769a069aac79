//! Error types for ext-catalog

use std::path::PathBuf;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while obtaining the module catalog.
///
/// Every variant except [`Error::SettingsParse`] means the catalog is
/// unavailable; none are retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure or timeout.
    #[error("catalog request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("catalog at {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The body is not a `{ "modules": [...] }` listing.
    #[error("malformed catalog from {origin}: {message}")]
    Malformed { origin: String, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog settings at {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
