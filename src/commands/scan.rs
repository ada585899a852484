//! `schemaviz scan` command.

use std::path::Path;

use crate::discovery;

/// Execute the `scan` command: print the discovery result as JSON.
///
/// # Errors
///
/// Returns an error string if `dir` is not a directory or the result cannot
/// be encoded.
pub fn run(dir: &Path) -> Result<(), String> {
    if !dir.is_dir() {
        return Err(format!("not a directory: {}", dir.display()));
    }
    let files = discovery::discover(dir);
    let json = serde_json::to_string_pretty(&files)
        .map_err(|e| format!("failed to encode scan result: {e}"))?;
    println!("{json}");
    Ok(())
}
