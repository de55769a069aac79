//! Error types for ext-resolve

/// Result type for resolution pipelines
pub type Result<T> = std::result::Result<T, Error>;

/// A failed scan or catalog fetch. Resolution itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Manifest(#[from] ext_manifest::Error),

    #[error(transparent)]
    Catalog(#[from] ext_catalog::Error),
}
