//! Exact versions and version coercion.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease};

use crate::error::{Error, Result};

static COERCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,16})(?:\.([0-9]{1,16}))?(?:\.([0-9]{1,16}))?").unwrap());

/// An exact version such as `1.2.3` or `2.0.0-rc.1`.
///
/// Build metadata is accepted when parsing but dropped, since it takes no
/// part in precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(semver::Version);

impl Version {
    /// Create a release version with no pre-release tag.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse an exact version.
    ///
    /// Leading `=` or `v` and surrounding whitespace are tolerated, as npm
    /// does for versions found in manifests and registries.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let bare = trimmed.strip_prefix('=').unwrap_or(trimmed).trim_start();
        let bare = bare.strip_prefix('v').unwrap_or(bare);

        let mut version = semver::Version::parse(bare).map_err(|source| Error::InvalidVersion {
            version: input.to_string(),
            source,
        })?;
        version.build = BuildMetadata::EMPTY;
        Ok(Self(version))
    }

    pub(crate) fn with_pre(major: u64, minor: u64, patch: u64, pre: Prerelease) -> Self {
        let mut version = semver::Version::new(major, minor, patch);
        version.pre = pre;
        Self(version)
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// The pre-release tag, empty for releases.
    pub fn pre(&self) -> &str {
        self.0.pre.as_str()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }

    /// `(major, minor, patch)` without the pre-release tag.
    pub fn release_tuple(&self) -> (u64, u64, u64) {
        (self.0.major, self.0.minor, self.0.patch)
    }

    pub fn as_semver(&self) -> &semver::Version {
        &self.0
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Pull the first `N[.N[.N]]` run out of an arbitrary string.
///
/// Missing components become zero, so `"^8"` coerces to `8.0.0` and
/// `"v4.9"` to `4.9.0`. Strings without any digits coerce to `None`.
pub fn coerce(input: &str) -> Option<Version> {
    let captures = COERCE_PATTERN.captures(input)?;
    let component = |index: usize| -> Option<u64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    Some(Version::new(component(1)?, component(2)?, component(3)?))
}
