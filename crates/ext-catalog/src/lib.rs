//! Catalog of module versions pre-installed in the target runtime.
//!
//! The hosting runtime publishes which `{name, version}` pairs it can
//! `require` without bundling. [`ModuleCatalog`] abstracts where that list
//! comes from: [`HttpCatalog`] asks the live endpoint, [`FileCatalog`] reads a
//! saved snapshot and [`StaticCatalog`] holds entries in memory.

pub mod client;
pub mod error;
pub mod settings;

use serde::{Deserialize, Serialize};

pub use client::{FileCatalog, HttpCatalog, StaticCatalog};
pub use error::{Error, Result};
pub use settings::CatalogSettings;

/// Version marker for modules compiled into the runtime itself.
pub const NATIVE_VERSION: &str = "native";

/// One module version the runtime provides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    /// An exact version, or [`NATIVE_VERSION`].
    pub version: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn is_native(&self) -> bool {
        self.version == NATIVE_VERSION
    }
}

/// Wire shape of the catalog response body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogListing {
    pub modules: Vec<CatalogEntry>,
}

/// A source of catalog entries.
///
/// One call is one snapshot; callers fetch once per resolution pass.
pub trait ModuleCatalog {
    fn fetch(&self) -> Result<Vec<CatalogEntry>>;
}

impl<T: ModuleCatalog + ?Sized> ModuleCatalog for &T {
    fn fetch(&self) -> Result<Vec<CatalogEntry>> {
        (**self).fetch()
    }
}

impl<T: ModuleCatalog + ?Sized> ModuleCatalog for Box<T> {
    fn fetch(&self) -> Result<Vec<CatalogEntry>> {
        (**self).fetch()
    }
}
