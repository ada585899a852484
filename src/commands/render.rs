//! `schemaviz render` command.

use std::path::Path;

use crate::dot::{self, DotStyle};
use crate::extract::{parse_schema, strip_code_fence};
use crate::schema::Schema;

/// Execute the `render` command: compile a schema file to DOT on stdout.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or is not a schema.
pub fn run(schema_file: &Path, styled: bool) -> Result<(), String> {
    let schema = load(schema_file)?;
    println!("{}", dot::compile(&schema, DotStyle::from_flag(styled)));
    Ok(())
}

fn load(path: &Path) -> Result<Schema, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    parse_schema(&strip_code_fence(&raw))
        .map_err(|e| format!("{} is not a valid schema: {e}", path.display()))
}
