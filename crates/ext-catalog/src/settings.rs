//! Catalog settings loaded from the `[catalog]` table of `a0-ext.toml`.
//!
//! Every field is optional in the file; missing values fall back to the
//! built-in defaults. Command-line flags and environment variables are
//! layered on top by the caller.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the optional project-level settings file.
pub const SETTINGS_FILENAME: &str = "a0-ext.toml";

/// Endpoint listing the modules pre-installed in the runtime.
pub const DEFAULT_CATALOG_URL: &str = "https://auth0-internal.us8.webtask.io/canirequire";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Where and how to query the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_url")]
    pub url: String,
    /// Runtime variant sent as `x-wt-runtime`, e.g. `node8`. When unset the
    /// caller derives it from the build's node target.
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            runtime: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    catalog: CatalogSettings,
}

impl CatalogSettings {
    /// Parse the `[catalog]` table out of a settings file's content.
    ///
    /// ```
    /// use ext_catalog::CatalogSettings;
    ///
    /// let settings = CatalogSettings::parse(r#"
    /// [catalog]
    /// url = "http://localhost:8721/canirequire"
    /// timeout_secs = 5
    /// "#).unwrap();
    ///
    /// assert_eq!(settings.timeout_secs, 5);
    /// assert_eq!(settings.runtime, None);
    /// ```
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: SettingsFile = toml::from_str(content)?;
        Ok(file.catalog)
    }

    /// Load settings from a specific file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings = Self::parse(&content).map_err(|e| Error::SettingsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if settings.timeout_secs == 0 {
            return Err(Error::SettingsParse {
                path: path.to_path_buf(),
                message: "catalog.timeout_secs must be at least 1".into(),
            });
        }
        Ok(settings)
    }

    /// Load `a0-ext.toml` from a project root, or the defaults when the file
    /// does not exist.
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILENAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        tracing::debug!(path = %path.display(), "loading catalog settings");
        Self::load(&path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured runtime variant, or `fallback` when none is set.
    pub fn runtime_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.runtime.as_deref().unwrap_or(fallback)
    }
}
