/// Inline SQL migrations for the mediatag database schema.
///
/// Simple inline migrations rather than sqlx migration files because the
/// schema is small and self-contained. One statement per entry.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: files table
    r#"
CREATE TABLE IF NOT EXISTS files (
    id TEXT PRIMARY KEY,
    path TEXT NOT NULL UNIQUE,
    size INTEGER NOT NULL DEFAULT 0,
    modified INTEGER NOT NULL DEFAULT 0,
    missing INTEGER NOT NULL DEFAULT 0
);
"#,
    // Migration 2: tags table
    r#"
CREATE TABLE IF NOT EXISTS tags (
    file_id TEXT NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    tag TEXT NOT NULL,
    cls TEXT NOT NULL DEFAULT '',
    modified INTEGER NOT NULL,
    deleted INTEGER NOT NULL DEFAULT 0,
    UNIQUE(file_id, tag, cls)
);
"#,
    // Migration 3: tag lookup index used by the frequency queries
    r#"
CREATE INDEX IF NOT EXISTS idx_tags_tag ON tags(tag);
"#,
];
