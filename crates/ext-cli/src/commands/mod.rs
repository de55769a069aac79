//! Command implementations for ext-cli

pub mod build;
pub mod externals;

use std::path::Path;

use ext_build::NodeTarget;
use ext_catalog::{CatalogSettings, FileCatalog, HttpCatalog, ModuleCatalog};
use tracing::info;

use crate::cli::CatalogArgs;
use crate::error::Result;

pub use build::{BuildClientOptions, BuildServerOptions, run_build_client, run_build_server};
pub use externals::run_externals;

/// Open the catalog selected by the command line.
///
/// A snapshot file wins outright. Otherwise `a0-ext.toml` under `root` is
/// read and any flag or environment value overrides it. The runtime variant
/// defaults to the project's node target.
pub fn open_catalog(
    args: &CatalogArgs,
    root: &Path,
    target: &NodeTarget,
) -> Result<Box<dyn ModuleCatalog>> {
    if let Some(file) = &args.catalog_file {
        info!(path = %file.display(), "using catalog snapshot");
        return Ok(Box::new(FileCatalog::new(file)));
    }

    let mut settings = CatalogSettings::load_from_root(root)?;
    if let Some(url) = &args.catalog_url {
        settings.url = url.clone();
    }
    if let Some(timeout) = args.catalog_timeout {
        settings.timeout_secs = timeout;
    }

    let runtime = settings.runtime.clone().unwrap_or_else(|| target.runtime_variant());
    info!(url = %settings.url, %runtime, "using catalog endpoint");
    Ok(Box::new(HttpCatalog::new(&settings, runtime)?))
}
