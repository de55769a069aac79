//! The `externals` report.

use std::path::Path;

use colored::Colorize;
use ext_build::NodeTarget;
use ext_manifest::{MANIFEST_FILENAME, PackageManifest};
use ext_resolve::{CompatibilityDecision, Resolution, resolve_externals};

use crate::cli::CatalogArgs;
use crate::commands::open_catalog;
use crate::error::Result;

/// Node target of the project at `root`, or the default without a manifest.
fn project_target(root: &Path) -> Result<NodeTarget> {
    let path = root.join(MANIFEST_FILENAME);
    if !path.is_file() {
        return Ok(NodeTarget::default());
    }
    let manifest = PackageManifest::load(&path)?;
    Ok(NodeTarget::resolve(&manifest.extension.node_target))
}

/// Resolve the tree under `path` and print compatible and incompatible
/// modules.
pub fn run_externals(path: &Path, json: bool, catalog: &CatalogArgs) -> Result<()> {
    let target = project_target(path)?;
    let catalog = open_catalog(catalog, path, &target)?;
    let resolution = resolve_externals(path, catalog.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        print_report(path, &resolution);
    }
    Ok(())
}

fn print_report(path: &Path, resolution: &Resolution) {
    println!(
        "{} Externals for {}",
        "=>".blue().bold(),
        path.display().to_string().cyan()
    );

    let compatible: Vec<_> = resolution.compatible().collect();
    println!();
    println!("{} ({})", "Compatible".green().bold(), compatible.len());
    for (name, version) in compatible {
        println!("   {}@{}", name, version.green());
    }

    let incompatible: Vec<_> = resolution.incompatible().collect();
    println!();
    println!("{} ({})", "Incompatible".yellow().bold(), incompatible.len());
    for (name, decision) in incompatible {
        if let CompatibilityDecision::Incompatible {
            reason,
            local_ranges,
            catalog_versions,
        } = decision
        {
            println!(
                "   {} {} (local: {}; catalog: {})",
                name,
                reason.to_string().yellow(),
                local_ranges.join(", "),
                catalog_versions
            );
        }
    }
}
