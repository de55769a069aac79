//! a0-ext
//!
//! Resolves which dependencies of a server extension the hosting runtime
//! already provides, and emits the bundler configuration for the build.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("failed to initialize logging: {e}")))?;
    tracing::debug!("verbose mode enabled");

    match cli.command {
        Commands::Externals {
            path,
            json,
            catalog,
        } => commands::run_externals(&path, json, &catalog),
        Commands::BuildServer {
            entry,
            destination,
            pkg,
            mode,
            output,
            pull_request,
            catalog,
        } => commands::run_build_server(&commands::BuildServerOptions {
            entry,
            destination,
            pkg,
            mode,
            output,
            pull_request,
            catalog,
        }),
        Commands::BuildClient {
            entry,
            destination,
            pkg,
            mode,
            output,
        } => commands::run_build_client(&commands::BuildClientOptions {
            entry,
            destination,
            pkg,
            mode,
            output,
        }),
    }
}
