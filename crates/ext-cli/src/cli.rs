//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ext_build::BuildMode;

/// Build server extensions against the runtime's pre-installed modules
#[derive(Parser, Debug)]
#[command(name = "a0-ext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the module catalog comes from
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogArgs {
    /// Catalog endpoint URL
    #[arg(long, env = "A0_EXT_CATALOG_URL", value_name = "URL")]
    pub catalog_url: Option<String>,

    /// Catalog request timeout
    #[arg(
        long,
        env = "A0_EXT_CATALOG_TIMEOUT",
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub catalog_timeout: Option<u64>,

    /// Read the catalog from a saved JSON snapshot instead of the network
    #[arg(long, value_name = "FILE")]
    pub catalog_file: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Report which dependencies the runtime provides
    ///
    /// Examples:
    ///   a0-ext externals
    ///   a0-ext externals ./my-extension --json
    ///   a0-ext externals --catalog-file canirequire.json
    Externals {
        /// Directory to scan for package.json files
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Emit the bundler configuration for a server extension
    #[command(name = "build:server")]
    BuildServer {
        /// Entry point, relative to the project root
        entry: PathBuf,

        /// Output folder, relative to the project root
        destination: PathBuf,

        /// Project manifest; its directory is the project root
        #[arg(long, default_value = "./package.json", value_name = "FILE")]
        pkg: PathBuf,

        /// Build mode (production or development)
        #[arg(long, default_value = "production")]
        mode: BuildMode,

        /// Write the configuration here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Pull-request number of a preview build
        #[arg(long, env = "PR_NUMBER")]
        pull_request: Option<String>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Emit the bundler configuration for the extension's browser UI
    #[command(name = "build:client")]
    BuildClient {
        /// UI entry point, relative to the project root
        entry: PathBuf,

        /// Output folder, relative to the project root
        destination: PathBuf,

        /// Project manifest; its directory is the project root
        #[arg(long, default_value = "./package.json", value_name = "FILE")]
        pkg: PathBuf,

        /// Build mode (production or development)
        #[arg(long, default_value = "production")]
        mode: BuildMode,

        /// Write the configuration here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}
