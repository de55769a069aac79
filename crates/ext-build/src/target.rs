//! Node.js target version and the language level it implies.

use std::fmt;
use std::sync::LazyLock;

use ext_manifest::DEFAULT_NODE_TARGET;
use ext_semver::{Range, Version, coerce};
use tracing::warn;

/// Node releases from here on run ES2017 output unmodified.
static ES2017_RUNTIMES: LazyLock<Range> = LazyLock::new(|| Range::parse(">=8.0.0").unwrap());

/// Runtime version the bundle is compiled for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTarget {
    version: Version,
}

impl NodeTarget {
    /// Interpret a `nodeTarget` setting.
    ///
    /// An exact version is used as-is, anything containing a version-like
    /// run is coerced (`^8` becomes `8.0.0`), and everything else falls back
    /// to the default target. Never fails.
    pub fn resolve(raw: &str) -> Self {
        if let Ok(version) = Version::parse(raw) {
            return Self { version };
        }
        if let Some(version) = coerce(raw) {
            return Self { version };
        }
        warn!(node_target = raw, fallback = DEFAULT_NODE_TARGET, "unusable node target");
        Self::default()
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// ECMAScript edition the minifier may emit: 8 for Node 8 and later,
    /// 6 before that.
    pub fn ecma(&self) -> u8 {
        if ES2017_RUNTIMES.satisfies(&self.version) {
            8
        } else {
            6
        }
    }

    /// Catalog runtime variant, e.g. `node8`.
    pub fn runtime_variant(&self) -> String {
        format!("node{}", self.version.major())
    }
}

impl Default for NodeTarget {
    fn default() -> Self {
        Self {
            version: Version::new(4, 2, 0),
        }
    }
}

impl fmt::Display for NodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.version, f)
    }
}
