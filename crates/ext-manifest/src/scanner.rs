//! Dependency scanning across every manifest under a search root.
//!
//! The scanner walks the tree (installed `node_modules` included), reads the
//! `dependencies` field of each `package.json`, and records for every module
//! name the distinct range expressions declared for it, in the order the
//! manifests were discovered. Hidden directories are not entered.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::MANIFEST_FILENAME;
use crate::error::{Error, Result};
use crate::package::strip_bom;

/// The slice of a manifest the scanner reads.
#[derive(Deserialize)]
struct DependencyView {
    #[serde(default)]
    dependencies: Option<BTreeMap<String, String>>,
}

/// Declared ranges per module name, aggregated over many manifests.
///
/// Each entry's range list is non-empty and free of duplicates. Names are
/// kept sorted so iteration order never depends on discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyTree {
    modules: BTreeMap<String, Vec<String>>,
}

impl DependencyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` was declared with `range`. Repeated ranges are
    /// ignored.
    pub fn insert(&mut self, name: impl Into<String>, range: impl Into<String>) {
        let range = range.into();
        let ranges = self.modules.entry(name.into()).or_default();
        if !ranges.contains(&range) {
            ranges.push(range);
        }
    }

    /// Merge one manifest's `dependencies` map.
    pub fn merge(&mut self, dependencies: &BTreeMap<String, String>) {
        for (name, range) in dependencies {
            self.insert(name.as_str(), range.as_str());
        }
    }

    /// The distinct ranges declared for `name`.
    pub fn ranges(&self, name: &str) -> Option<&[String]> {
        self.modules.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Iterate `(name, ranges)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.modules
            .iter()
            .map(|(name, ranges)| (name.as_str(), ranges.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<N: Into<String>, R: Into<String>> FromIterator<(N, R)> for DependencyTree {
    fn from_iter<I: IntoIterator<Item = (N, R)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (name, range) in iter {
            tree.insert(name, range);
        }
        tree
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// List every `package.json` under `root`, shallowest first, then by path.
pub fn find_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            Error::io(path, e.into())
        })?;
        if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILENAME {
            found.push((entry.depth(), entry.into_path()));
        }
    }
    found.sort();
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

fn read_dependencies(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let view: DependencyView =
        serde_json::from_str(strip_bom(&content)).map_err(|e| Error::parse(path, e))?;
    Ok(view.dependencies.unwrap_or_default())
}

/// Aggregate the `dependencies` of every manifest under `root`.
///
/// A single malformed manifest fails the whole scan.
#[tracing::instrument(level = "debug", skip_all, fields(root = %root.display()))]
pub fn scan_dependencies(root: &Path) -> Result<DependencyTree> {
    let manifests = find_manifests(root)?;
    debug!(count = manifests.len(), "discovered manifests");

    let mut tree = DependencyTree::new();
    for path in &manifests {
        let dependencies = read_dependencies(path)?;
        trace!(path = %path.display(), count = dependencies.len(), "read dependencies");
        tree.merge(&dependencies);
    }

    debug!(modules = tree.len(), "aggregated dependency tree");
    Ok(tree)
}
