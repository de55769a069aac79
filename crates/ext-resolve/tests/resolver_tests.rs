//! Resolution over scanned trees and fixed catalogs

use std::collections::BTreeMap;

use ext_catalog::{CatalogEntry, FileCatalog, ModuleCatalog, StaticCatalog};
use ext_manifest::DependencyTree;
use ext_resolve::{
    CatalogVersions, CompatibilityDecision, Error, IncompatibleReason, Resolution, resolve,
    resolve_externals,
};
use ext_test_utils::TestProject;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn entries(pairs: &[(&str, &str)]) -> Vec<CatalogEntry> {
    pairs
        .iter()
        .map(|(name, version)| CatalogEntry::new(*name, *version))
        .collect()
}

fn compatible(version: &str) -> CompatibilityDecision {
    CompatibilityDecision::Compatible {
        version: version.to_string(),
    }
}

#[test]
fn test_newest_satisfying_version_wins() {
    let tree: DependencyTree = [("async", "^1.0.0")].into_iter().collect();
    let catalog = entries(&[("async", "1.0.0"), ("async", "1.2.0"), ("async", "1.5.0")]);

    let resolution = resolve(&tree, &catalog);
    assert_eq!(resolution.get("async"), Some(&compatible("1.5.0")));
}

#[test]
fn test_cross_manifest_disagreement_is_incompatible() {
    let project = TestProject::new();
    project.package("", "my-ext", "1.0.0", &[("lodash", "^4.17.0")]);
    project.package("node_modules/legacy", "legacy", "0.3.0", &[("lodash", "^3.10.0")]);
    let catalog = StaticCatalog::from_iter([("lodash", "3.10.1"), ("lodash", "4.17.4")]);

    let resolution = resolve_externals(project.root(), &catalog).unwrap();

    assert_eq!(
        resolution.get("lodash"),
        Some(&CompatibilityDecision::Incompatible {
            reason: IncompatibleReason::ConflictingRanges,
            local_ranges: vec!["^4.17.0".into(), "^3.10.0".into()],
            catalog_versions: CatalogVersions::NotAvailable,
        })
    );
}

#[test]
fn test_identical_ranges_across_manifests_agree() {
    let project = TestProject::new();
    project.package("", "my-ext", "1.0.0", &[("async", "^2.0.0")]);
    project.package("node_modules/request", "request", "2.81.0", &[("async", "^2.0.0")]);
    let catalog = StaticCatalog::from_iter([("async", "2.1.2")]);

    let resolution = resolve_externals(project.root(), &catalog).unwrap();
    assert_eq!(resolution.get("async"), Some(&compatible("2.1.2")));
}

#[test]
fn test_native_entries_are_never_selected() {
    let tree: DependencyTree = [("crypto", "*"), ("moment", "^2.0.0")].into_iter().collect();
    let catalog = entries(&[("crypto", "native"), ("moment", "native"), ("moment", "2.19.1")]);

    let resolution = resolve(&tree, &catalog);

    assert_eq!(
        resolution.get("crypto"),
        Some(&CompatibilityDecision::Incompatible {
            reason: IncompatibleReason::NativeOnly,
            local_ranges: vec!["*".into()],
            catalog_versions: CatalogVersions::NotAvailable,
        })
    );
    assert_eq!(resolution.get("moment"), Some(&compatible("2.19.1")));
}

#[test]
fn test_missing_module_is_not_in_catalog() {
    let tree: DependencyTree = [("left-pad", "^1.0.0")].into_iter().collect();
    let resolution = resolve(&tree, &entries(&[("async", "2.1.2")]));

    match resolution.get("left-pad") {
        Some(CompatibilityDecision::Incompatible {
            reason,
            catalog_versions,
            ..
        }) => {
            assert_eq!(*reason, IncompatibleReason::NotInCatalog);
            assert_eq!(*catalog_versions, CatalogVersions::NotAvailable);
        }
        other => panic!("expected NotInCatalog, got {other:?}"),
    }
}

#[test]
fn test_unsatisfied_lists_catalog_versions_in_order() {
    let tree: DependencyTree = [("request", "^2.88.0")].into_iter().collect();
    let catalog = entries(&[
        ("request", "2.81.0"),
        ("request", "native"),
        ("request", "2.27.0"),
    ]);

    let resolution = resolve(&tree, &catalog);
    assert_eq!(
        resolution.get("request"),
        Some(&CompatibilityDecision::Incompatible {
            reason: IncompatibleReason::Unsatisfied,
            local_ranges: vec!["^2.88.0".into()],
            catalog_versions: CatalogVersions::Versions(vec!["2.81.0".into(), "2.27.0".into()]),
        })
    );
}

#[test]
fn test_catalog_order_does_not_change_selection() {
    let tree: DependencyTree = [("async", "^2.0.0"), ("moment", "^3.0.0")].into_iter().collect();
    let forward = entries(&[
        ("async", "2.1.2"),
        ("moment", "2.19.1"),
        ("async", "2.6.0"),
        ("async", "1.5.2"),
    ]);
    let mut backward = forward.clone();
    backward.reverse();

    let first = resolve(&tree, &forward);
    let second = resolve(&tree, &backward);

    assert_eq!(first.get("async"), Some(&compatible("2.6.0")));
    assert_eq!(first.get("async"), second.get("async"));
    assert_eq!(
        first.incompatible().map(|(name, _)| name).collect::<Vec<_>>(),
        second.incompatible().map(|(name, _)| name).collect::<Vec<_>>()
    );
}

#[test]
fn test_catalog_entries_for_undeclared_modules_are_ignored() {
    let tree: DependencyTree = [("async", "^2.0.0")].into_iter().collect();
    let catalog = entries(&[("async", "2.1.2"), ("express", "4.16.2")]);

    let resolution = resolve(&tree, &catalog);
    assert_eq!(resolution.len(), 1);
    assert!(resolution.get("express").is_none());
}

#[test]
fn test_resolve_externals_from_snapshot() {
    let project = TestProject::new();
    project.package("", "my-ext", "1.0.0", &[("async", "^2.0.0"), ("lodash", "^5.0.0")]);
    let snapshot = project.catalog(
        ".catalog/snapshot.json",
        &[("async", "1.0.0"), ("async", "2.1.2"), ("lodash", "4.17.4")],
    );

    let resolution = resolve_externals(project.root(), &FileCatalog::new(snapshot)).unwrap();

    assert_eq!(resolution.externals()["async"], "async@2.1.2");
    assert!(!resolution.get("lodash").unwrap().is_compatible());
}

struct Unreachable;

impl ModuleCatalog for Unreachable {
    fn fetch(&self) -> ext_catalog::Result<Vec<CatalogEntry>> {
        Err(ext_catalog::Error::Status {
            url: "http://catalog.invalid/canirequire".into(),
            status: 502,
        })
    }
}

#[test]
fn test_catalog_failure_aborts_resolution() {
    let project = TestProject::new();
    project.package("", "my-ext", "1.0.0", &[("async", "^2.0.0")]);

    let err = resolve_externals(project.root(), &Unreachable).unwrap_err();
    assert!(matches!(err, Error::Catalog(ext_catalog::Error::Status { status: 502, .. })));
}

#[test]
fn test_scan_failure_aborts_before_fetch() {
    let project = TestProject::new();
    project.write_file("package.json", "{ broken");

    let err = resolve_externals(project.root(), &Unreachable).unwrap_err();
    assert!(matches!(err, Error::Manifest(ext_manifest::Error::ManifestParse { .. })));
}

fn module_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["async", "lodash", "moment", "request", "pino"])
        .prop_map(str::to_string)
}

fn range_expr() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["^1.0.0", "^2.0.0", "~1.2.0", "*", ">=1.5.0 <3", "1.x"])
        .prop_map(str::to_string)
}

fn catalog_version() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["1.0.0", "1.2.3", "1.5.0", "2.1.2", "native", "garbage"])
        .prop_map(str::to_string)
}

type Pairs = Vec<(String, String)>;

/// Generated declarations and catalog, plus a permutation of each.
fn shuffled_inputs() -> impl Strategy<Value = (Pairs, Pairs, Pairs, Pairs)> {
    (
        prop::collection::vec((module_name(), range_expr()), 0..12),
        prop::collection::vec((module_name(), catalog_version()), 0..20),
    )
        .prop_flat_map(|(declared, catalog)| {
            (
                Just(declared.clone()),
                Just(catalog.clone()),
                Just(declared).prop_shuffle(),
                Just(catalog).prop_shuffle(),
            )
        })
}

fn catalog_entries(pairs: Pairs) -> Vec<CatalogEntry> {
    pairs
        .into_iter()
        .map(|(name, version)| CatalogEntry::new(name, version))
        .collect()
}

/// The order-independent part of a resolution: the selected version of each
/// compatible module and the reason of each incompatible one.
fn verdicts(resolution: &Resolution) -> BTreeMap<String, Result<String, IncompatibleReason>> {
    resolution
        .iter()
        .map(|(name, decision)| {
            let verdict = match decision {
                CompatibilityDecision::Compatible { version } => Ok(version.clone()),
                CompatibilityDecision::Incompatible { reason, .. } => Err(*reason),
            };
            (name.to_string(), verdict)
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_every_module_gets_exactly_one_decision(
        declared in prop::collection::vec((module_name(), range_expr()), 0..12),
        catalog in prop::collection::vec((module_name(), catalog_version()), 0..20),
    ) {
        let tree: DependencyTree = declared.into_iter().collect();
        let catalog: Vec<CatalogEntry> = catalog
            .into_iter()
            .map(|(name, version)| CatalogEntry::new(name, version))
            .collect();

        let resolution = resolve(&tree, &catalog);

        prop_assert_eq!(resolution.len(), tree.len());
        for name in tree.names() {
            prop_assert!(resolution.get(name).is_some());
        }
        let split = resolution.compatible().count() + resolution.incompatible().count();
        prop_assert_eq!(split, resolution.len());
    }

    #[test]
    fn prop_resolution_ignores_input_order(
        (declared, catalog, declared_shuffled, catalog_shuffled) in shuffled_inputs(),
    ) {
        let tree: DependencyTree = declared.into_iter().collect();
        let shuffled_tree: DependencyTree = declared_shuffled.into_iter().collect();

        let original = verdicts(&resolve(&tree, &catalog_entries(catalog)));
        let shuffled = verdicts(&resolve(&shuffled_tree, &catalog_entries(catalog_shuffled)));

        prop_assert_eq!(original, shuffled);
    }

    #[test]
    fn prop_compatible_version_satisfies_declared_range(
        range in range_expr(),
        versions in prop::collection::vec(catalog_version(), 0..8),
    ) {
        let tree: DependencyTree = [("async", range.clone())].into_iter().collect();
        let catalog: Vec<CatalogEntry> =
            versions.iter().map(|v| CatalogEntry::new("async", v.as_str())).collect();

        if let Some(CompatibilityDecision::Compatible { version }) = resolve(&tree, &catalog).get("async") {
            prop_assert!(ext_semver::satisfies(version, &range));
            prop_assert!(versions.contains(version));
        }
    }
}
