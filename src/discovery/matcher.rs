//! File matchers derived from glob-like pattern strings.

/// How a pattern decides whether a file is a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// File name ends with the given suffix (`*.sql` becomes `.sql`).
    Suffix(String),
    /// File name equals the segment, or the relative path contains it.
    FileName(String),
}

impl Matcher {
    /// Builds a matcher from a pattern such as `**/migrations/**/*.sql`.
    ///
    /// Only the final non-`**` segment is significant, so every directory
    /// qualifier in the pattern is ignored.
    #[must_use]
    pub fn from_pattern(pattern: &str) -> Self {
        let segment = pattern.split('/').rfind(|part| *part != "**").unwrap_or("");
        if segment.contains('*') {
            Self::Suffix(segment.replacen('*', "", 1))
        } else {
            Self::FileName(segment.to_string())
        }
    }

    /// Tests a file given its name and its path relative to the scan root.
    #[must_use]
    pub fn matches(&self, file_name: &str, relative_path: &str) -> bool {
        match self {
            Self::Suffix(suffix) => file_name.ends_with(suffix.as_str()),
            Self::FileName(name) => file_name == name || relative_path.contains(name.as_str()),
        }
    }
}
