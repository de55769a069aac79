//! Error types for ext-semver

/// Result type for version and range parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing versions and ranges
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not an exact `MAJOR.MINOR.PATCH[-pre][+build]` version.
    #[error("invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// Not a valid npm range expression.
    #[error("invalid range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },
}

impl Error {
    pub(crate) fn range(range: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            range: range.to_string(),
            reason: reason.into(),
        }
    }
}
