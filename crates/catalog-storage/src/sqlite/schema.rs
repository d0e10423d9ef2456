//! DDL statements and migrations for the SQLite document schema.
//!
//! Every record lives in one `documents` table keyed by `(collection, id)`.
//! Bodies are JSON text. `group_name` is the last segment of the collection
//! path so collection-group reads are a single indexed lookup. Timestamps
//! are TEXT in ISO 8601 format.

/// Current schema version. Bumped whenever DDL or migrations change.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Core DDL statements executed during `init_schema`.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // -- Documents table -----------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection  TEXT NOT NULL,
        id          TEXT NOT NULL,
        group_name  TEXT NOT NULL,
        parent_id   TEXT,
        body        TEXT NOT NULL DEFAULT '{}',
        created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        PRIMARY KEY (collection, id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_documents_group ON documents(group_name)",
    "CREATE INDEX IF NOT EXISTS idx_documents_parent ON documents(parent_id)",
    // -- Metadata table ------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

/// Schema migrations applied after initial DDL.
///
/// Each migration is a `(name, sql)` pair. Migrations are tracked in the
/// `metadata` table under the key `migration:<name>` so they run at most once.
pub const MIGRATIONS: &[(&str, &str)] = &[];
