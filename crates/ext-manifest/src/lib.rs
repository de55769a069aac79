//! Project manifests and dependency scanning.
//!
//! This crate reads `package.json` files: the project's own manifest with its
//! `auth0-extension` settings block, and every manifest found under a search
//! root, whose `dependencies` are aggregated into a [`DependencyTree`].

pub mod error;
pub mod package;
pub mod scanner;

/// The manifest filename looked for during scanning.
pub const MANIFEST_FILENAME: &str = "package.json";

/// The key of the extension settings block in the project manifest.
pub const EXTENSION_KEY: &str = "auth0-extension";

/// Oldest supported long-term runtime release, the default transpilation target.
pub const DEFAULT_NODE_TARGET: &str = "4.2.0";

pub use error::{Error, Result};
pub use package::{ExtensionSettings, ExternalSpec, PackageManifest};
pub use scanner::{DependencyTree, find_manifests, scan_dependencies};
