//! SQLite schema definition.

/// Complete database schema for clinic-visits settings.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Settings (scalar key/value pairs)
-- ============================================================================

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
