//! npm-style versions and version ranges.
//!
//! Package manifests declare dependencies with the range grammar used by the
//! JavaScript ecosystem (`^1.2.0`, `~0.3`, `1.x || >=2.1.0 <3`,
//! `1.2.3 - 2.0`). This crate parses those ranges and checks concrete
//! versions against them, following the same desugaring and pre-release
//! rules as the reference npm implementation.
//!
//! # Example
//!
//! ```
//! use ext_semver::{Range, Version};
//!
//! let range = Range::parse("^1.2.0").unwrap();
//! assert!(range.satisfies(&Version::parse("1.5.0").unwrap()));
//! assert!(!range.satisfies(&Version::parse("2.0.0").unwrap()));
//! assert!(!range.satisfies(&Version::parse("1.6.0-beta.1").unwrap()));
//! ```

pub mod error;
pub mod range;
pub mod version;

pub use error::{Error, Result};
pub use range::{Range, satisfies};
pub use version::{Version, coerce};
