//! Command dispatch and handlers.

pub mod analyze;
pub mod render;
pub mod scan;

use crate::cli::Command;

/// Environment variable naming a cassette file to record `analyze` into.
pub const RECORD_VAR: &str = "SCHEMAVIZ_RECORD";

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub async fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Analyze { repo_url, styled, dot, replay } => {
            let options = analyze::Options { styled: *styled, dot_only: *dot };
            analyze::run(repo_url, options, replay.as_deref()).await
        }
        Command::Scan { dir } => scan::run(dir),
        Command::Render { schema_file, styled } => render::run(schema_file, *styled),
    }
}
