//! Heuristic discovery of schema-defining files in a checkout.
//!
//! The tree is walked once, depth-first in directory listing order, with
//! dependency and build directories pruned. Every entry of the pattern table
//! is then evaluated against that listing. At most
//! [`MAX_FILES_PER_PATTERN`] matches per pattern are read, and unreadable files
//! are skipped so that a partial result is still returned.

pub mod matcher;
pub mod patterns;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub use matcher::Matcher;
pub use patterns::{TechPatterns, EXCLUDED_DIRS, MAX_FILES_PER_PATTERN, TECH_PATTERNS};

/// Candidate schema files found in a checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFiles {
    /// Technology labels in pattern-table order, without duplicates.
    pub detected_tech: Vec<String>,
    /// Relative paths of the files read, in discovery order.
    pub files_analyzed: Vec<String>,
    /// Relative path to full file text.
    pub file_contents: IndexMap<String, String>,
    /// Number of entries in `file_contents`.
    pub total_files: usize,
}

impl SchemaFiles {
    /// Returns `true` when no candidate file was read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_files == 0
    }

    fn add_tech(&mut self, tech: &str) {
        if !self.detected_tech.iter().any(|t| t == tech) {
            self.detected_tech.push(tech.to_string());
        }
    }

    fn add_file(&mut self, relative: String, content: String) {
        self.files_analyzed.push(relative.clone());
        self.file_contents.insert(relative, content);
        self.total_files = self.file_contents.len();
    }
}

/// A regular file found by the walk.
#[derive(Debug, Clone)]
struct ListedFile {
    path: PathBuf,
    name: String,
    relative: String,
}

/// Scans `root` for schema-defining files.
#[must_use]
pub fn discover(root: &Path) -> SchemaFiles {
    discover_with(root, &TECH_PATTERNS)
}

/// Scans `root` using an explicit pattern table.
#[must_use]
pub fn discover_with(root: &Path, table: &[TechPatterns]) -> SchemaFiles {
    let listing = list_files(root);
    let mut result = SchemaFiles::default();

    for entry in table {
        for pattern in entry.patterns {
            let matcher = Matcher::from_pattern(pattern);
            let mut matches =
                listing.iter().filter(|f| matcher.matches(&f.name, &f.relative)).peekable();
            if matches.peek().is_none() {
                continue;
            }
            result.add_tech(entry.tech);

            for file in matches.take(MAX_FILES_PER_PATTERN) {
                if result.file_contents.contains_key(&file.relative) {
                    continue;
                }
                match std::fs::read_to_string(&file.path) {
                    Ok(content) => result.add_file(file.relative.clone(), content),
                    Err(e) => warn!(path = %file.path.display(), error = %e, "could not read file"),
                }
            }
        }
    }

    result
}

/// Lists regular files under `root`, pruning excluded directories.
fn list_files(root: &Path) -> Vec<ListedFile> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !patterns::is_excluded(&e.file_name().to_string_lossy()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e
                .path()
                .strip_prefix(root)
                .unwrap_or(e.path())
                .to_string_lossy()
                .into_owned();
            ListedFile {
                name: e.file_name().to_string_lossy().into_owned(),
                path: e.into_path(),
                relative,
            }
        })
        .collect()
}
