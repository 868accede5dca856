//! Database migrations for rooms and memberships
//!
//! Each migration is applied atomically and tracked in the
//! `room_schema_version` table.

use super::StoreError;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Current schema version for core_room
pub const CURRENT_ROOM_SCHEMA_VERSION: i32 = 1;

/// Migration descriptor
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub up_sql: &'static str,
}

/// All available migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial rooms and memberships schema",
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS room_schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chat_room (
                id TEXT PRIMARY KEY CHECK(length(id) > 0),
                name TEXT NOT NULL CHECK(length(name) > 0),
                is_public INTEGER NOT NULL CHECK(is_public IN (0, 1)),
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chat_room_public_name ON chat_room(is_public, name);

            -- One row per (room, member) pair
            CREATE TABLE IF NOT EXISTS chat_room_member (
                room_id TEXT NOT NULL,
                member_id TEXT NOT NULL,
                joined_at INTEGER NOT NULL,
                PRIMARY KEY (room_id, member_id),
                FOREIGN KEY (room_id) REFERENCES chat_room(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_chat_room_member_member ON chat_room_member(member_id);
        "#,
    }]
}

/// Current time in milliseconds, for bookkeeping columns
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Get current schema version from database
fn get_current_version(pool: &Pool<SqliteConnectionManager>) -> Result<i32, StoreError> {
    let conn = pool.get()?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS room_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let version: Option<i32> = conn.query_row(
        "SELECT MAX(version) FROM room_schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version.unwrap_or(0))
}

/// Run all pending migrations
pub fn migrate(pool: &Pool<SqliteConnectionManager>) -> Result<(), StoreError> {
    let current_version = get_current_version(pool)?;
    let pending: Vec<_> = get_migrations()
        .into_iter()
        .filter(|m| m.version > current_version)
        .collect();

    if pending.is_empty() {
        return Ok(());
    }

    let conn = pool.get()?;

    for migration in pending {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.up_sql)?;
        tx.execute(
            "INSERT INTO room_schema_version (version, applied_at) VALUES (?, ?)",
            params![migration.version, now_millis()],
        )?;
        tx.commit()?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied room schema migration"
        );
    }

    Ok(())
}
