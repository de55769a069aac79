//! Invocation inputs: arguments and the ambient environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

/// Bundler mode; also injected as `NODE_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Production,
    Development,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!(
                "unknown build mode '{other}' (expected production or development)"
            )),
        }
    }
}

/// Paths and mode for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArgs {
    /// Project root; entry and destination are relative to it.
    pub root: PathBuf,
    pub entry_point: PathBuf,
    pub destination_folder: PathBuf,
    pub mode: BuildMode,
}

impl BuildArgs {
    pub fn new(
        root: impl Into<PathBuf>,
        entry_point: impl Into<PathBuf>,
        destination_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            entry_point: entry_point.into(),
            destination_folder: destination_folder.into(),
            mode: BuildMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Values taken from the invoking environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    /// Pull-request identifier of a preview build, injected as
    /// `PULL_REQUEST`.
    pub pull_request: Option<String>,
}
