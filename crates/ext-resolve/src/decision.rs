//! Per-module verdicts and the resolution map that holds them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Placeholder reported when no catalog versions were considered.
pub const NOT_AVAILABLE: &str = "N/A";

/// Why a module must be bundled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IncompatibleReason {
    /// Manifests in the tree declare different ranges for the module.
    ConflictingRanges,
    /// The catalog has no entry for the module.
    NotInCatalog,
    /// The catalog only lists the module as compiled into the runtime.
    NativeOnly,
    /// No catalog version satisfies the declared range.
    Unsatisfied,
}

impl fmt::Display for IncompatibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ConflictingRanges => "conflicting ranges",
            Self::NotInCatalog => "not in catalog",
            Self::NativeOnly => "native only",
            Self::Unsatisfied => "no satisfying version",
        };
        f.write_str(text)
    }
}

/// Catalog versions reported alongside an incompatible verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogVersions {
    /// The catalog was not consulted, or had nothing usable.
    NotAvailable,
    /// Every version seen for the module, in catalog order.
    Versions(Vec<String>),
}

impl Serialize for CatalogVersions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
            Self::Versions(versions) => versions.serialize(serializer),
        }
    }
}

impl fmt::Display for CatalogVersions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
            Self::Versions(versions) => f.write_str(&versions.join(", ")),
        }
    }
}

/// Whether the runtime's copy of a module can replace the bundled one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CompatibilityDecision {
    /// Load `version` from the runtime.
    Compatible { version: String },
    /// Bundle the module.
    #[serde(rename_all = "camelCase")]
    Incompatible {
        reason: IncompatibleReason,
        local_ranges: Vec<String>,
        catalog_versions: CatalogVersions,
    },
}

impl CompatibilityDecision {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Self::Compatible { .. })
    }

    /// The selected runtime version, if compatible.
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Compatible { version } => Some(version),
            Self::Incompatible { .. } => None,
        }
    }
}

/// Decisions for every module of one resolution pass, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Resolution {
    decisions: BTreeMap<String, CompatibilityDecision>,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, decision: CompatibilityDecision) {
        self.decisions.insert(name.into(), decision);
    }

    pub fn get(&self, name: &str) -> Option<&CompatibilityDecision> {
        self.decisions.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompatibilityDecision)> {
        self.decisions
            .iter()
            .map(|(name, decision)| (name.as_str(), decision))
    }

    /// `(name, version)` for every compatible module, in name order.
    pub fn compatible(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decisions
            .iter()
            .filter_map(|(name, decision)| Some((name.as_str(), decision.version()?)))
    }

    /// Every incompatible module with its verdict, in name order.
    pub fn incompatible(&self) -> impl Iterator<Item = (&str, &CompatibilityDecision)> {
        self.iter().filter(|(_, decision)| !decision.is_compatible())
    }

    /// Compatible modules in `name@version` form, keyed by name.
    pub fn externals(&self) -> BTreeMap<String, String> {
        self.compatible()
            .map(|(name, version)| (name.to_string(), format!("{name}@{version}")))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

impl FromIterator<(String, CompatibilityDecision)> for Resolution {
    fn from_iter<I: IntoIterator<Item = (String, CompatibilityDecision)>>(iter: I) -> Self {
        Self {
            decisions: iter.into_iter().collect(),
        }
    }
}
