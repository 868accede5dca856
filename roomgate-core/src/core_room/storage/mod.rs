//! Storage layer for rooms
//!
//! Provides SQLite-based persistence behind the room directory traits.

pub mod migrations;
pub mod sql_store;

use super::directory::DirectoryError;
use super::room::RoomError;

pub use migrations::{migrate, CURRENT_ROOM_SCHEMA_VERSION};
pub use sql_store::SqlRoomDirectory;

/// Low-level storage failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage task failed: {0}")]
    Task(String),
}

impl From<StoreError> for DirectoryError {
    fn from(e: StoreError) -> Self {
        DirectoryError::DataUnavailable(e.to_string())
    }
}

impl From<StoreError> for RoomError {
    fn from(e: StoreError) -> Self {
        RoomError::Storage(e.to_string())
    }
}
