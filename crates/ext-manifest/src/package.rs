//! The project manifest and its `auth0-extension` settings block.
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "my-extension",
//!   "version": "1.4.0",
//!   "dependencies": { "async": "^2.0.0", "lodash": "^4.17.0" },
//!   "auth0-extension": {
//!     "externals": ["@babel/core@^7.0.0-beta.44", "request"],
//!     "excluded": ["pino"],
//!     "bundleModules": true,
//!     "useBabel": true,
//!     "nodeTarget": "8.9.0",
//!     "settings": { "API_URL": "https://example.com" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::DEFAULT_NODE_TARGET;

/// Module-name substrings that are transpiled even inside `node_modules`.
pub const DEFAULT_EXCLUDED: [&str; 2] = ["express-conditional-middleware", "pino"];

/// Top-level project manifest (`package.json`).
///
/// Only the fields the build needs are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// Runtime dependencies. `devDependencies` and `peerDependencies` are
    /// never read.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// The extension settings block, defaulted when absent.
    #[serde(default, rename = "auth0-extension")]
    pub extension: ExtensionSettings,
}

impl PackageManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(strip_bom(content))
    }

    /// Load and parse a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&content).map_err(|e| Error::parse(path, e))
    }
}

/// Build options declared under `auth0-extension`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSettings {
    /// Constants injected into `process.env` at compile time.
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
    /// Modules forced external, as `name` or `name@range`.
    #[serde(default)]
    pub externals: Vec<String>,
    /// Module-name substrings still transpiled inside `node_modules`.
    #[serde(default = "default_excluded")]
    pub excluded: Vec<String>,
    /// `false` externalizes every declared dependency without consulting
    /// the catalog.
    #[serde(default = "default_true")]
    pub bundle_modules: bool,
    #[serde(default = "default_true")]
    pub use_babel: bool,
    #[serde(default = "default_node_target")]
    pub node_target: String,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            settings: BTreeMap::new(),
            externals: Vec::new(),
            excluded: default_excluded(),
            bundle_modules: true,
            use_babel: true,
            node_target: default_node_target(),
        }
    }
}

impl ExtensionSettings {
    /// Parsed `externals` entries, skipping blank ones.
    pub fn external_specs(&self) -> Vec<ExternalSpec> {
        self.externals
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| ExternalSpec::parse(entry))
            .collect()
    }
}

fn default_excluded() -> Vec<String> {
    DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_node_target() -> String {
    DEFAULT_NODE_TARGET.to_string()
}

/// One entry of the `externals` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSpec {
    /// Module name, scope included (`@babel/core`).
    pub name: String,
    /// The whole entry when it carries a version (`@babel/core@^7.0.0`).
    pub pinned: Option<String>,
}

impl ExternalSpec {
    /// Split an entry on the first `@` after position 0, so scoped names
    /// keep their leading `@`.
    pub fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        match entry.char_indices().skip(1).find(|&(_, c)| c == '@') {
            Some((at, _)) => Self {
                name: entry[..at].to_string(),
                pinned: Some(entry.to_string()),
            },
            None => Self {
                name: entry.to_string(),
                pinned: None,
            },
        }
    }

    /// The module reference the runtime resolves: the pinned entry, or the
    /// bare name.
    pub fn reference(&self) -> &str {
        self.pinned.as_deref().unwrap_or(&self.name)
    }
}

pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}
