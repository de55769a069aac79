//! End-to-end tests for the build pipeline
//!
//! Exercises the complete flow: scan -> catalog -> resolve -> synthesize.

use ext_build::{BuildArgs, BuildConfiguration, BuildEnv, synthesize};
use ext_catalog::{FileCatalog, ModuleCatalog, StaticCatalog};
use ext_manifest::PackageManifest;
use ext_resolve::{CompatibilityDecision, IncompatibleReason, resolve_externals};
use ext_test_utils::TestProject;
use pretty_assertions::assert_eq;
use serde_json::json;

fn build(project: &TestProject, catalog: &dyn ModuleCatalog) -> BuildConfiguration {
    let manifest = PackageManifest::load(&project.root().join("package.json")).unwrap();
    let resolution = resolve_externals(project.root(), catalog).unwrap();
    let args = BuildArgs::new(project.root(), "index.js", "dist");
    synthesize(&manifest, &resolution, &args, &BuildEnv::default())
}

#[test]
fn test_runtime_module_is_external_and_skipped_by_transpiler() {
    let project = TestProject::new();
    project.package("", "my-ext", "1.0.0", &[("async", "^2.0.0")]);
    project.package("node_modules/async", "async", "2.1.2", &[]);
    let catalog = StaticCatalog::from_iter([("async", "1.0.0"), ("async", "2.1.2")]);

    let resolution = resolve_externals(project.root(), &catalog).unwrap();
    assert_eq!(
        resolution.get("async"),
        Some(&CompatibilityDecision::Compatible {
            version: "2.1.2".into()
        })
    );

    let config = build(&project, &catalog);
    assert_eq!(config.externals["async"], "commonjs async@2.1.2");

    let exclude = &config.script_rule().unwrap().exclude;
    let installed = project.root().join("node_modules/async/dist/async.js");
    assert!(exclude.excludes(&installed.to_string_lossy()));
    assert!(!exclude.excludes(&project.root().join("index.js").to_string_lossy()));
}

#[test]
fn test_disagreeing_tree_bundles_the_module() {
    let project = TestProject::new();
    project.package("", "my-ext", "1.0.0", &[("lodash", "^4.17.0"), ("async", "^2.0.0")]);
    project.package("node_modules/legacy", "legacy", "0.2.0", &[("lodash", "^3.10.0")]);
    let snapshot = project.catalog(
        "snapshots/catalog.json",
        &[("lodash", "3.10.1"), ("lodash", "4.17.4"), ("async", "2.6.0")],
    );

    let catalog = FileCatalog::new(snapshot);
    let resolution = resolve_externals(project.root(), &catalog).unwrap();
    match resolution.get("lodash") {
        Some(CompatibilityDecision::Incompatible { reason, .. }) => {
            assert_eq!(*reason, IncompatibleReason::ConflictingRanges);
        }
        other => panic!("expected lodash to be bundled, got {other:?}"),
    }

    let config = build(&project, &catalog);
    assert_eq!(
        serde_json::to_value(&config.externals).unwrap(),
        json!({ "async": "commonjs async@2.6.0" })
    );
}

#[test]
fn test_project_overrides_apply_on_top_of_resolution() {
    let project = TestProject::new();
    project.manifest(
        "",
        &json!({
            "name": "my-ext",
            "version": "2.0.0",
            "dependencies": { "async": "^2.0.0", "request": "^2.81.0" },
            "auth0-extension": {
                "externals": ["request@2.81.0", "auth0"],
                "excluded": [],
                "nodeTarget": "8.9.0",
                "settings": { "AUDIENCE": "\"urn:api\"" }
            }
        }),
    );
    let catalog = StaticCatalog::from_iter([("async", "2.1.2"), ("request", "native")]);

    let config = build(&project, &catalog);

    assert_eq!(
        serde_json::to_value(&config.externals).unwrap(),
        json!({
            "async": "commonjs async@2.1.2",
            "auth0": "commonjs auth0",
            "request": "commonjs request@2.81.0"
        })
    );
    assert_eq!(config.constants["AUDIENCE"], "\"urn:api\"");
    assert_eq!(config.minifier.uglify_options.ecma, 8);

    let exclude = &config.script_rule().unwrap().exclude;
    assert!(exclude.excludes("/srv/my-ext/node_modules/pino/pino.js"));
}

#[test]
fn test_configuration_round_trips_through_file() {
    let project = TestProject::new();
    project.package("", "my-ext", "1.0.0", &[]);
    let config = build(&project, &StaticCatalog::default());

    let path = project.root().join("dist/webpack.config.json");
    config.write(&path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&project.read_file("dist/webpack.config.json")).unwrap();
    assert_eq!(written, serde_json::to_value(&config).unwrap());
}
