//! [`TestProject`] builder for extension project scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// A temporary project directory with helpers for writing manifests.
///
/// # Example
///
/// ```rust,no_run
/// use ext_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.package("", "my-ext", "1.0.0", &[("async", "^2.0.0")]);
/// project.package("node_modules/async", "async", "2.1.2", &[("lodash", "^4.0.0")]);
/// project.assert_file_exists("node_modules/async/package.json");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to a path relative to the root, creating parents.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a `package.json` with arbitrary JSON into `dir`.
    pub fn manifest(&self, dir: &str, manifest: &Value) -> PathBuf {
        let relative = if dir.is_empty() {
            "package.json".to_string()
        } else {
            format!("{dir}/package.json")
        };
        self.write_file(&relative, &serde_json::to_string_pretty(manifest).unwrap())
    }

    /// Write a `package.json` with a name, version and runtime dependencies.
    pub fn package(
        &self,
        dir: &str,
        name: &str,
        version: &str,
        dependencies: &[(&str, &str)],
    ) -> PathBuf {
        self.manifest(
            dir,
            &json!({
                "name": name,
                "version": version,
                "dependencies": dependency_map(dependencies),
            }),
        )
    }

    /// Write a catalog snapshot in the `{ "modules": [...] }` wire shape.
    pub fn catalog(&self, relative: &str, entries: &[(&str, &str)]) -> PathBuf {
        let modules: Vec<Value> = entries
            .iter()
            .map(|(name, version)| json!({ "name": name, "version": version }))
            .collect();
        self.write_file(
            relative,
            &serde_json::to_string_pretty(&json!({ "modules": modules })).unwrap(),
        )
    }

    /// Read a file relative to the root.
    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).unwrap()
    }

    /// Assert that a file exists relative to the root.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(path.exists(), "expected file to exist: {}", path.display());
    }
}

/// Build a JSON object from `(name, range)` pairs.
pub fn dependency_map(dependencies: &[(&str, &str)]) -> Value {
    let map: Map<String, Value> = dependencies
        .iter()
        .map(|(name, range)| (name.to_string(), Value::String(range.to_string())))
        .collect();
    Value::Object(map)
}
