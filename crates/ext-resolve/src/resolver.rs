//! Resolution of a dependency tree against one catalog snapshot.

use std::collections::BTreeMap;
use std::path::Path;

use ext_catalog::{CatalogEntry, ModuleCatalog};
use ext_manifest::{DependencyTree, scan_dependencies};
use ext_semver::{Range, Version};
use tracing::{debug, instrument, trace};

use crate::decision::{CatalogVersions, CompatibilityDecision, IncompatibleReason, Resolution};
use crate::error::Result;

/// Decide every module of `tree` against `catalog`.
///
/// Pure: the same tree and entries always produce the same resolution, and
/// every module in the tree gets exactly one decision.
pub fn resolve(tree: &DependencyTree, catalog: &[CatalogEntry]) -> Resolution {
    let mut by_name: BTreeMap<&str, Vec<&CatalogEntry>> = BTreeMap::new();
    for entry in catalog {
        by_name.entry(entry.name.as_str()).or_default().push(entry);
    }

    tree.iter()
        .map(|(name, ranges)| {
            let entries = by_name.get(name).map(Vec::as_slice).unwrap_or_default();
            let decision = decide(ranges, entries);
            debug!(module = name, compatible = decision.is_compatible(), "decided");
            (name.to_string(), decision)
        })
        .collect()
}

fn incompatible(
    reason: IncompatibleReason,
    ranges: &[String],
    catalog_versions: CatalogVersions,
) -> CompatibilityDecision {
    CompatibilityDecision::Incompatible {
        reason,
        local_ranges: ranges.to_vec(),
        catalog_versions,
    }
}

fn decide(ranges: &[String], entries: &[&CatalogEntry]) -> CompatibilityDecision {
    let [range] = ranges else {
        return incompatible(
            IncompatibleReason::ConflictingRanges,
            ranges,
            CatalogVersions::NotAvailable,
        );
    };

    let versions: Vec<&str> = entries
        .iter()
        .filter(|entry| !entry.is_native())
        .map(|entry| entry.version.as_str())
        .collect();

    if versions.is_empty() {
        let reason = if entries.is_empty() {
            IncompatibleReason::NotInCatalog
        } else {
            IncompatibleReason::NativeOnly
        };
        return incompatible(reason, ranges, CatalogVersions::NotAvailable);
    }

    match newest_satisfying(range, &versions) {
        Some(version) => CompatibilityDecision::Compatible {
            version: version.to_string(),
        },
        None => incompatible(
            IncompatibleReason::Unsatisfied,
            ranges,
            CatalogVersions::Versions(versions.iter().map(|v| v.to_string()).collect()),
        ),
    }
}

/// The highest catalog version satisfying `range`. Unparseable versions
/// never match; equal versions keep catalog order.
fn newest_satisfying<'a>(range: &str, versions: &[&'a str]) -> Option<&'a str> {
    let range = match Range::parse(range) {
        Ok(range) => range,
        Err(e) => {
            trace!(error = %e, "declared range does not parse");
            return None;
        }
    };

    let mut candidates: Vec<(Version, &str)> = versions
        .iter()
        .filter_map(|raw| Version::parse(raw).ok().map(|version| (version, *raw)))
        .collect();
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    candidates
        .into_iter()
        .find(|(version, _)| range.satisfies(version))
        .map(|(_, raw)| raw)
}

/// Scan `root`, fetch the catalog once and resolve.
///
/// A scan or catalog failure aborts the whole pass.
#[instrument(level = "debug", skip(catalog), fields(root = %root.display()))]
pub fn resolve_externals(root: &Path, catalog: &dyn ModuleCatalog) -> Result<Resolution> {
    let tree = scan_dependencies(root)?;
    let entries = catalog.fetch()?;
    let resolution = resolve(&tree, &entries);
    debug!(
        modules = resolution.len(),
        compatible = resolution.compatible().count(),
        "resolved externals"
    );
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("^1.0.0", &["1.0.0", "1.2.0", "1.5.0"], Some("1.5.0"))]
    #[case("^1.0.0", &["1.5.0", "1.0.0", "1.2.0"], Some("1.5.0"))]
    #[case("~1.2.0", &["1.2.0", "1.2.9", "1.3.0"], Some("1.2.9"))]
    #[case("^2.0.0", &["1.0.0", "2.1.2"], Some("2.1.2"))]
    #[case("^3.0.0", &["1.0.0", "2.1.2"], None)]
    #[case("*", &["not-a-version", "0.1.0"], Some("0.1.0"))]
    #[case("^1.0.0", &["1.1.0-beta.1", "1.0.0"], Some("1.0.0"))]
    #[case("v1 nonsense >", &["1.0.0"], None)]
    fn test_newest_satisfying(
        #[case] range: &str,
        #[case] versions: &[&str],
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(newest_satisfying(range, versions), expected);
    }

    #[test]
    fn test_equal_versions_keep_catalog_order() {
        assert_eq!(
            newest_satisfying("1.0.0", &["1.0.0+first", "1.0.0+second"]),
            Some("1.0.0+first")
        );
    }
}
