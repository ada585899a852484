//! Binary entrypoint for the `schemaviz` CLI.

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Recording is handled in commands::analyze via SCHEMAVIZ_RECORD=<file>.
    match schemaviz::run(std::env::args()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
