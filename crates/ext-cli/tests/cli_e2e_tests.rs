//! End-to-end tests for the a0-ext binary.
//!
//! Every test reads the catalog from a snapshot file so nothing touches the
//! network.

use assert_cmd::Command;
use ext_test_utils::TestProject;
use predicates::prelude::*;
use serde_json::{Value, json};

fn a0_ext() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("a0-ext"));
    cmd.env_remove("A0_EXT_CATALOG_URL")
        .env_remove("A0_EXT_CATALOG_TIMEOUT")
        .env_remove("PR_NUMBER")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn sample_project() -> TestProject {
    let project = TestProject::new();
    project.manifest(
        "",
        &json!({
            "name": "my-ext",
            "version": "1.2.0",
            "dependencies": { "async": "^2.0.0", "lodash": "^4.17.0" },
            "auth0-extension": { "nodeTarget": "8.9.0" }
        }),
    );
    project.package("node_modules/async", "async", "2.1.2", &[("lodash", "^4.14.0")]);
    project.catalog(
        "catalog.json",
        &[("async", "1.0.0"), ("async", "2.1.2"), ("lodash", "4.17.4")],
    );
    project
}

#[test]
fn test_help_output() {
    a0_ext()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("externals"))
        .stdout(predicate::str::contains("build:server"))
        .stdout(predicate::str::contains("build:client"));
}

#[test]
fn test_version_output() {
    a0_ext()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("a0-ext"));
}

#[test]
fn test_externals_report() {
    let project = sample_project();

    a0_ext()
        .current_dir(project.root())
        .args(["externals", "--catalog-file", "catalog.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compatible (1)"))
        .stdout(predicate::str::contains("async@2.1.2"))
        .stdout(predicate::str::contains("Incompatible (1)"))
        .stdout(predicate::str::contains("lodash conflicting ranges"))
        .stdout(predicate::str::contains("^4.17.0, ^4.14.0"));
}

#[test]
fn test_externals_json() {
    let project = sample_project();
    let catalog = project.root().join("catalog.json");

    let output = a0_ext()
        .args(["externals", "--json", "--catalog-file"])
        .arg(&catalog)
        .arg(project.root())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["async"], json!({ "status": "compatible", "version": "2.1.2" }));
    assert_eq!(report["lodash"]["reason"], "conflictingRanges");
    assert_eq!(report["lodash"]["catalogVersions"], "N/A");
}

#[test]
fn test_build_server_prints_configuration() {
    let project = sample_project();

    let output = a0_ext()
        .current_dir(project.root())
        .args(["build:server", "./index.js", "./dist"])
        .args(["--catalog-file", "catalog.json", "--pull-request", "17"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["entry"], "index.js");
    assert_eq!(config["output"]["filename"], "my-ext.extension.1.2.0.js");
    assert_eq!(config["externals"], json!({ "async": "commonjs async@2.1.2" }));
    assert_eq!(config["constants"]["PULL_REQUEST"], "\"17\"");
    assert_eq!(config["minifier"]["uglifyOptions"]["ecma"], 8);
}

#[test]
fn test_build_server_reads_pull_request_from_env() {
    let project = sample_project();

    let output = a0_ext()
        .current_dir(project.root())
        .env("PR_NUMBER", "99")
        .args(["build:server", "index.js", "dist", "--catalog-file", "catalog.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["constants"]["PULL_REQUEST"], "\"99\"");
}

#[test]
fn test_build_server_writes_output_file() {
    let project = sample_project();
    let pkg = project.root().join("package.json");

    a0_ext()
        .current_dir(project.root())
        .args(["build:server", "index.js", "dist", "--mode", "development"])
        .args(["--catalog-file", "catalog.json", "--output", "build/webpack.json"])
        .arg("--pkg")
        .arg(&pkg)
        .assert()
        .success()
        .stdout(predicate::str::contains("my-ext.extension.1.2.0.js"));

    let config: Value = serde_json::from_str(&project.read_file("build/webpack.json")).unwrap();
    assert_eq!(config["mode"], "development");
    assert_eq!(config["constants"]["NODE_ENV"], "\"development\"");
}

#[test]
fn test_build_client_prints_configuration() {
    let project = sample_project();

    let output = a0_ext()
        .current_dir(project.root())
        .args(["build:client", "./client/app.jsx", "./dist/client"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["entry"], json!({ "app": "client/app.jsx" }));
    assert_eq!(config["output"]["filename"], "my-ext.ui.1.2.0.js");
    assert_eq!(config["output"]["publicPath"], "/app/");
    assert_eq!(config["stats"]["filename"], "manifest.json");
    assert!(config.get("externals").is_none());
}

#[test]
fn test_build_client_development_writes_output_file() {
    let project = sample_project();

    a0_ext()
        .current_dir(project.root())
        .args(["build:client", "app.jsx", "dist", "--mode", "development"])
        .args(["-o", "build/client.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundle.js"));

    let config: Value = serde_json::from_str(&project.read_file("build/client.json")).unwrap();
    assert_eq!(config["output"]["publicPath"], "http://localhost:3000/app/");
    assert_eq!(config["definitions"]["__DEV__"], "true");
    assert!(config.get("optimization").is_none());
}

#[test]
fn test_build_server_without_bundling_skips_catalog() {
    let project = TestProject::new();
    project.manifest(
        "",
        &json!({
            "name": "solo",
            "version": "0.1.0",
            "dependencies": { "async": "^2.0.0" },
            "auth0-extension": { "bundleModules": false }
        }),
    );

    // The catalog file does not exist; it must never be read.
    let output = a0_ext()
        .current_dir(project.root())
        .args(["build:server", "index.js", "dist", "--catalog-file", "missing.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["externals"], json!({ "async": "commonjs async" }));
}

#[test]
fn test_missing_manifest_fails() {
    let project = TestProject::new();

    a0_ext()
        .current_dir(project.root())
        .args(["build:server", "index.js", "dist", "--catalog-file", "catalog.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn test_malformed_catalog_fails() {
    let project = sample_project();
    project.write_file("broken.json", "{\"modules\": 7}");

    a0_ext()
        .current_dir(project.root())
        .args(["externals", "--catalog-file", "broken.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("malformed catalog"));
}

#[test]
fn test_unreachable_catalog_fails() {
    let project = sample_project();

    a0_ext()
        .current_dir(project.root())
        .args(["externals", "--catalog-url", "http://127.0.0.1:9/canirequire"])
        .args(["--catalog-timeout", "2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("catalog request"));
}
