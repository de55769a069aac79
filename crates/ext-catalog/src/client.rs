//! [`ModuleCatalog`] implementations.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::settings::CatalogSettings;
use crate::{CatalogEntry, CatalogListing, ModuleCatalog};

/// Request header naming the runtime variant whose catalog is wanted.
pub const RUNTIME_HEADER: &str = "x-wt-runtime";

fn parse_listing(body: &str, origin: &str) -> Result<Vec<CatalogEntry>> {
    let listing: CatalogListing = serde_json::from_str(body).map_err(|e| Error::Malformed {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;
    Ok(listing.modules)
}

/// Live catalog served over HTTP.
///
/// Each [`fetch`](ModuleCatalog::fetch) performs exactly one GET; failures
/// are reported as-is and never retried.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    url: String,
    runtime: String,
}

impl HttpCatalog {
    /// Build a client for `settings.url`, asking for the `runtime` variant
    /// (e.g. `node8`).
    pub fn new(settings: &CatalogSettings, runtime: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|source| Error::Request {
                url: settings.url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            url: settings.url.clone(),
            runtime: runtime.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    fn request_error(&self, source: reqwest::Error) -> Error {
        Error::Request {
            url: self.url.clone(),
            source,
        }
    }
}

impl ModuleCatalog for HttpCatalog {
    #[instrument(level = "debug", skip(self), fields(url = %self.url, runtime = %self.runtime))]
    fn fetch(&self) -> Result<Vec<CatalogEntry>> {
        let response = self
            .client
            .get(&self.url)
            .header(RUNTIME_HEADER, &self.runtime)
            .send()
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| self.request_error(e))?;
        let entries = parse_listing(&body, &self.url)?;
        debug!(entries = entries.len(), "fetched catalog");
        Ok(entries)
    }
}

/// Catalog snapshot saved to disk in the same shape the endpoint returns.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModuleCatalog for FileCatalog {
    fn fetch(&self) -> Result<Vec<CatalogEntry>> {
        let body = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let entries = parse_listing(&body, &self.path.display().to_string())?;
        debug!(path = %self.path.display(), entries = entries.len(), "read catalog snapshot");
        Ok(entries)
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for StaticCatalog {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, version)| CatalogEntry::new(name, version))
                .collect(),
        )
    }
}

impl ModuleCatalog for StaticCatalog {
    fn fetch(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.entries.clone())
    }
}
