//! Core library entry for the `schemaviz` CLI.
//!
//! The pipeline clones a GitHub repository, discovers files that define its
//! database schema, asks a language model to extract an entity-relationship
//! schema from them, and compiles that schema to Graphviz DOT.

pub mod adapters;
pub mod analyze;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod discovery;
pub mod dot;
pub mod error;
pub mod extract;
pub mod ports;
pub mod schema;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub async fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    init_tracing(cli.verbose);
    commands::dispatch(&cli.command).await
}

/// Logs to stderr so stdout carries only command output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "schemaviz=debug" } else { "schemaviz=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
