//! DDL run when a connection opens.
//!
//! `user_version` records the layout; bump it alongside any table change.

pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- String-keyed values, mirroring the host application's key/value storage.
-- Writes replace the whole value for a key.
CREATE TABLE IF NOT EXISTS kv (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,   -- JSON document
    updated_at TEXT NOT NULL    -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
