//! Technology pattern table and walk exclusions.

/// Files matched per pattern entry before further matches are ignored.
pub const MAX_FILES_PER_PATTERN: usize = 5;

/// Directory names the walk never descends into.
pub const EXCLUDED_DIRS: [&str; 5] = ["node_modules", ".git", "vendor", "dist", "build"];

/// A technology label and the patterns that indicate it.
#[derive(Debug, Clone, Copy)]
pub struct TechPatterns {
    /// Label reported in `detected_tech`.
    pub tech: &'static str,
    /// Glob-like patterns, evaluated independently.
    pub patterns: &'static [&'static str],
}

/// Pattern table in reporting order.
pub const TECH_PATTERNS: [TechPatterns; 7] = [
    TechPatterns {
        tech: "SQL",
        patterns: &["**/*.sql", "**/migrations/**/*.sql", "**/schema.sql"],
    },
    TechPatterns { tech: "Prisma", patterns: &["**/schema.prisma", "**/prisma/schema.prisma"] },
    TechPatterns { tech: "Sequelize", patterns: &["**/models/**/*.js", "**/models/**/*.ts"] },
    TechPatterns { tech: "Mongoose", patterns: &["**/models/**/*.js", "**/models/**/*.ts"] },
    TechPatterns { tech: "Django", patterns: &["**/models.py", "**/models/**/*.py"] },
    TechPatterns {
        tech: "Laravel",
        patterns: &["**/app/Models/**/*.php", "**/database/migrations/**/*.php"],
    },
    TechPatterns { tech: "Ruby on Rails", patterns: &["**/app/models/**/*.rb", "**/db/schema.rb"] },
];

/// Returns `true` if a directory entry with this name must be skipped.
#[must_use]
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}
