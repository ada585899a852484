//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `schemaviz`.
#[derive(Debug, Parser)]
#[command(
    name = "schemaviz",
    version,
    about = "Turn a repository's database schema into an ER diagram"
)]
pub struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clone a GitHub repository, extract its schema and print the result.
    Analyze {
        /// Repository URL, e.g. `https://github.com/owner/repo`.
        repo_url: String,
        /// Use the enhanced diagram style.
        #[arg(long)]
        styled: bool,
        /// Print only the DOT text instead of the full JSON result.
        #[arg(long)]
        dot: bool,
        /// Answer git and model calls from a recorded cassette.
        #[arg(long, value_name = "CASSETTE")]
        replay: Option<PathBuf>,
    },
    /// List the schema files discovery finds in a local directory.
    Scan {
        /// Directory to scan.
        dir: PathBuf,
    },
    /// Compile a schema JSON file to DOT.
    Render {
        /// Path to the schema JSON (Markdown fences are accepted).
        schema_file: PathBuf,
        /// Use the enhanced diagram style.
        #[arg(long)]
        styled: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_analyze_with_flags() {
        let cli = Cli::parse_from([
            "schemaviz",
            "analyze",
            "https://github.com/acme/shop",
            "--styled",
            "--dot",
        ]);
        match cli.command {
            Command::Analyze { repo_url, styled, dot, replay } => {
                assert_eq!(repo_url, "https://github.com/acme/shop");
                assert!(styled && dot);
                assert!(replay.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_scan_and_render() {
        let cli = Cli::parse_from(["schemaviz", "-v", "scan", "."]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Scan { .. }));

        let cli = Cli::parse_from(["schemaviz", "render", "schema.json"]);
        assert!(matches!(cli.command, Command::Render { styled: false, .. }));
    }

    #[test]
    fn analyze_requires_url() {
        assert!(Cli::try_parse_from(["schemaviz", "analyze"]).is_err());
    }
}
