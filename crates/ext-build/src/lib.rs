//! Build configuration synthesis.
//!
//! Combines the project manifest, the compatibility [`Resolution`] and the
//! invocation arguments into the [`BuildConfiguration`] handed to the
//! bundler: output naming, externals, transpilation rules, minifier options,
//! injected constants and module search paths. The extension's browser UI
//! gets its own [`ClientConfiguration`].
//!
//! [`Resolution`]: ext_resolve::Resolution

pub mod args;
pub mod client;
pub mod config;
pub mod error;
pub mod minify;
pub mod rules;
pub mod target;

pub use args::{BuildArgs, BuildEnv, BuildMode};
pub use client::{ClientConfiguration, synthesize_client};
pub use config::{Banner, BuildConfiguration, OutputSettings, ResolveSettings, synthesize};
pub use error::{Error, Result};
pub use minify::MinifierSettings;
pub use rules::{ExcludePolicy, TranspileRule};
pub use target::NodeTarget;
