//! The `build:server` and `build:client` commands.

use std::path::{Path, PathBuf};

use colored::Colorize;
use ext_build::{BuildArgs, BuildEnv, BuildMode, NodeTarget, synthesize, synthesize_client};
use ext_manifest::PackageManifest;
use ext_resolve::{Resolution, resolve_externals};
use tracing::info;

use crate::cli::CatalogArgs;
use crate::commands::open_catalog;
use crate::error::Result;

/// Arguments of one `build:server` invocation.
#[derive(Debug, Clone)]
pub struct BuildServerOptions {
    pub entry: PathBuf,
    pub destination: PathBuf,
    pub pkg: PathBuf,
    pub mode: BuildMode,
    pub output: Option<PathBuf>,
    pub pull_request: Option<String>,
    pub catalog: CatalogArgs,
}

/// Directory holding `pkg`; a bare filename means the working directory.
fn project_root(pkg: &Path) -> PathBuf {
    match pkg.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Load the manifest, resolve externals and emit the bundler configuration.
pub fn run_build_server(options: &BuildServerOptions) -> Result<()> {
    let manifest = PackageManifest::load(&options.pkg)?;
    let root = project_root(&options.pkg);
    let extension = &manifest.extension;

    // Without bundling every dependency is external; the catalog is moot.
    let resolution = if extension.bundle_modules {
        let target = NodeTarget::resolve(&extension.node_target);
        let catalog = open_catalog(&options.catalog, &root, &target)?;
        resolve_externals(&root, catalog.as_ref())?
    } else {
        info!("bundleModules is off, externalizing all dependencies");
        Resolution::new()
    };

    for (name, _) in resolution.incompatible() {
        info!(module = name, "bundling module the runtime cannot provide");
    }

    let args = BuildArgs {
        root,
        entry_point: options.entry.clone(),
        destination_folder: options.destination.clone(),
        mode: options.mode,
    };
    let env = BuildEnv {
        pull_request: options.pull_request.clone(),
    };
    let config = synthesize(&manifest, &resolution, &args, &env);

    match &options.output {
        Some(path) => {
            config.write(path)?;
            println!(
                "{} Wrote build configuration for {} to {}",
                "OK".green().bold(),
                config.output.filename.cyan(),
                path.display()
            );
        }
        None => println!("{}", config.to_json()?),
    }
    Ok(())
}

/// Arguments of one `build:client` invocation.
#[derive(Debug, Clone)]
pub struct BuildClientOptions {
    pub entry: PathBuf,
    pub destination: PathBuf,
    pub pkg: PathBuf,
    pub mode: BuildMode,
    pub output: Option<PathBuf>,
}

/// Load the manifest and emit the UI bundler configuration.
///
/// The UI bundles everything, so no catalog is consulted.
pub fn run_build_client(options: &BuildClientOptions) -> Result<()> {
    let manifest = PackageManifest::load(&options.pkg)?;
    let args = BuildArgs {
        root: project_root(&options.pkg),
        entry_point: options.entry.clone(),
        destination_folder: options.destination.clone(),
        mode: options.mode,
    };
    let config = synthesize_client(&manifest, &args);

    match &options.output {
        Some(path) => {
            config.write(path)?;
            println!(
                "{} Wrote client configuration for {} to {}",
                "OK".green().bold(),
                config.output.filename.cyan(),
                path.display()
            );
        }
        None => println!("{}", config.to_json()?),
    }
    Ok(())
}
