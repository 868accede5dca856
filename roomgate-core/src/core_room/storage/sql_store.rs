//! SQL-based room directory
//!
//! Queries run on the blocking thread pool; the async trait methods only
//! await the spawned work.

use super::migrations::{migrate, now_millis};
use super::StoreError;
use crate::core_room::directory::{DirectoryError, DirectoryResult, RoomDirectory, RoomRegistry};
use crate::core_room::room::{NewRoom, Room, RoomError, RoomVisibility};
use crate::core_room::summary::RoomSummary;
use crate::core_room::types::{RoomId, UserId};
use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::Path;
use tracing::debug;

/// Raw `(id, name, member_count)` projection
type SummaryRow = (String, String, i64);

/// SQL-based storage for rooms and memberships
#[derive(Clone)]
pub struct SqlRoomDirectory {
    pool: Pool<SqliteConnectionManager>,
}

impl SqlRoomDirectory {
    /// Create a directory over an existing pool, running migrations first
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Result<Self, StoreError> {
        migrate(&pool)?;
        Ok(Self { pool })
    }

    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>, pool_size: u32) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        debug!(path = %path.display(), pool_size, "Opened room database");
        Self::new(pool)
    }

    /// Create a new in-memory store.
    ///
    /// The pool holds a single connection: every SQLite in-memory connection
    /// is its own database.
    pub fn memory() -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder().max_size(1).build(manager)?;
        Self::new(pool)
    }

    /// Record a membership regardless of room visibility
    pub async fn add_membership(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RoomError> {
        let room_id = room_id.clone();
        let user_id = user_id.clone();
        self.run_blocking(move |conn| {
            let tx = write_transaction(conn)?;
            if room_visibility(&tx, &room_id)?.is_none() {
                return Err(RoomError::RoomNotFound(room_id));
            }
            if is_member(&tx, &room_id, &user_id)? {
                return Err(RoomError::AlreadyMember(room_id));
            }
            insert_membership(&tx, &room_id, &user_id)?;
            tx.commit().map_err(StoreError::from)?;
            Ok(())
        })
        .await
    }

    async fn run_blocking<T, E, F>(&self, op: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: FnOnce(&Connection) -> Result<T, E> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get().map_err(StoreError::from)?;
            op(&*conn)
        })
        .await
        .map_err(|e| E::from(StoreError::Task(e.to_string())))?
    }
}

/// Takes the write lock up front, so a check-then-insert cannot interleave
/// with another connection's writer.
fn write_transaction(conn: &Connection) -> Result<Transaction<'_>, StoreError> {
    Ok(Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?)
}

fn normalize(rows: Vec<SummaryRow>) -> DirectoryResult<Vec<RoomSummary>> {
    rows.into_iter()
        .map(|(id, name, count)| RoomSummary::from_row(id, name, count))
        .collect()
}

fn query_public_summaries(conn: &Connection) -> Result<Vec<SummaryRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.name, COUNT(m.member_id)
         FROM chat_room r
         LEFT JOIN chat_room_member m ON m.room_id = r.id
         WHERE r.is_public = 1
         GROUP BY r.id, r.name
         ORDER BY r.name, r.id",
    )?;

    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_member_summaries(conn: &Connection, user_id: &UserId) -> Result<Vec<SummaryRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.name,
                (SELECT COUNT(*) FROM chat_room_member c WHERE c.room_id = r.id)
         FROM chat_room r
         JOIN chat_room_member m ON m.room_id = r.id
         WHERE m.member_id = ?1
         ORDER BY r.name, r.id",
    )?;

    let rows = stmt
        .query_map(params![user_id.as_str()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn room_visibility(conn: &Connection, room_id: &RoomId) -> Result<Option<RoomVisibility>, StoreError> {
    let is_public: Option<bool> = conn
        .query_row(
            "SELECT is_public FROM chat_room WHERE id = ?1",
            params![room_id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(is_public.map(RoomVisibility::from_public_flag))
}

fn is_member(conn: &Connection, room_id: &RoomId, user_id: &UserId) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM chat_room_member WHERE room_id = ?1 AND member_id = ?2",
        params![room_id.as_str(), user_id.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn insert_membership(conn: &Connection, room_id: &RoomId, user_id: &UserId) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO chat_room_member (room_id, member_id, joined_at) VALUES (?1, ?2, ?3)",
        params![room_id.as_str(), user_id.as_str(), now_millis()],
    )?;
    Ok(())
}

#[async_trait]
impl RoomDirectory for SqlRoomDirectory {
    async fn list_public_room_summaries(&self) -> DirectoryResult<Vec<RoomSummary>> {
        let rows = self
            .run_blocking(|conn| query_public_summaries(conn).map_err(DirectoryError::from))
            .await?;
        normalize(rows)
    }

    async fn list_room_summaries_for_member(
        &self,
        user_id: &UserId,
    ) -> DirectoryResult<Vec<RoomSummary>> {
        let user_id = user_id.clone();
        let rows = self
            .run_blocking(move |conn| {
                query_member_summaries(conn, &user_id).map_err(DirectoryError::from)
            })
            .await?;
        normalize(rows)
    }
}

#[async_trait]
impl RoomRegistry for SqlRoomDirectory {
    async fn create_room(&self, new_room: NewRoom, creator: &UserId) -> Result<Room, RoomError> {
        let room = Room::from_new(new_room);
        let creator = creator.clone();
        let stored = room.clone();

        self.run_blocking(move |conn| {
            let tx = write_transaction(conn)?;
            tx.execute(
                "INSERT INTO chat_room (id, name, is_public, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    stored.id.as_str(),
                    &stored.name,
                    stored.is_public(),
                    now_millis()
                ],
            )
            .map_err(StoreError::from)?;
            insert_membership(&tx, &stored.id, &creator)?;
            tx.commit().map_err(StoreError::from)?;

            debug!(room = %stored.id, name = %stored.name, creator = %creator, "Created room");
            Ok::<_, RoomError>(())
        })
        .await?;

        Ok(room)
    }

    async fn join_room(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RoomError> {
        let room_id = room_id.clone();
        let user_id = user_id.clone();

        self.run_blocking(move |conn| {
            let tx = write_transaction(conn)?;

            let visibility = room_visibility(&tx, &room_id)?
                .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;
            if is_member(&tx, &room_id, &user_id)? {
                return Err(RoomError::AlreadyMember(room_id));
            }
            if visibility != RoomVisibility::Public {
                return Err(RoomError::NotJoinable(room_id));
            }

            insert_membership(&tx, &room_id, &user_id)?;
            tx.commit().map_err(StoreError::from)?;

            debug!(room = %room_id, user = %user_id, "Joined room");
            Ok(())
        })
        .await
    }
}
