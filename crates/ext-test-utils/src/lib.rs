//! Shared test utilities for the extension bundler workspace.
//!
//! This crate provides fixtures for building throwaway project trees. It is
//! a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`](project::TestProject) builder for
//!   manifest trees and catalog snapshots

pub mod project;

pub use project::TestProject;
