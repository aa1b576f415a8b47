//! SQLite-backed slot
//!
//! A small key-value table, one row per slot, in the same spirit as a
//! browser's named local storage:
//!
//! ```text
//! slots(key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at INTEGER NOT NULL)
//! ```

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{Slot, StorageError, StorageResult};

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_info (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS slots (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?1)",
        params![SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Check if the schema needs to be initialized
pub fn needs_init(conn: &Connection) -> bool {
    let version: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_info WHERE key = 'version'",
            [],
            |row| row.get(0),
        )
        .ok();

    version.and_then(|v| v.parse::<i32>().ok()) != Some(SCHEMA_VERSION)
}

/// A slot stored as a row of a SQLite key-value table
pub struct SqliteSlot {
    conn: Connection,
    key: String,
}

impl SqliteSlot {
    /// Open or create the database at `path` and bind to slot `key`
    pub fn open(path: &Path, key: impl Into<String>) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn, key)
    }

    fn with_connection(conn: Connection, key: impl Into<String>) -> StorageResult<Self> {
        if needs_init(&conn) {
            init_schema(&conn)?;
        }
        Ok(Self {
            conn,
            key: key.into(),
        })
    }
}

impl Slot for SqliteSlot {
    fn name(&self) -> &str {
        &self.key
    }

    fn load(&self) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, payload: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.key, payload, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}
