//! Compatibility resolution between declared dependencies and the runtime
//! catalog.
//!
//! A dependency can be left out of the bundle and `require`d from the runtime
//! only when every manifest in the tree agrees on one range and the catalog
//! holds a version satisfying it. Everything else is bundled.
//!
//! # Example
//!
//! ```
//! use ext_catalog::CatalogEntry;
//! use ext_manifest::DependencyTree;
//! use ext_resolve::{CompatibilityDecision, resolve};
//!
//! let tree: DependencyTree = [("async", "^2.0.0")].into_iter().collect();
//! let catalog = vec![
//!     CatalogEntry::new("async", "1.0.0"),
//!     CatalogEntry::new("async", "2.1.2"),
//! ];
//!
//! let resolution = resolve(&tree, &catalog);
//! assert_eq!(
//!     resolution.get("async"),
//!     Some(&CompatibilityDecision::Compatible { version: "2.1.2".into() })
//! );
//! ```

pub mod decision;
pub mod error;
pub mod resolver;

pub use decision::{CatalogVersions, CompatibilityDecision, IncompatibleReason, Resolution};
pub use error::{Error, Result};
pub use resolver::{resolve, resolve_externals};
