//! Room Directory traits
//!
//! The read side ([`RoomDirectory`]) is all the resolver depends on. The write
//! side ([`RoomRegistry`]) backs room creation and joining.

use super::room::{NewRoom, Room, RoomError};
use super::summary::RoomSummary;
use super::types::{RoomId, UserId};
use async_trait::async_trait;

/// Result type for directory reads
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Read-only query surface over rooms and memberships.
///
/// Implementations must ensure:
/// - `member_count` is the exact number of memberships at read time
/// - results are ordered by [`RoomSummary::listing_order`]
/// - reads have no side effects, so repeating one is always safe
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// All public rooms, with their member counts
    async fn list_public_room_summaries(&self) -> DirectoryResult<Vec<RoomSummary>>;

    /// All rooms, public or private, in which `user_id` holds a membership.
    ///
    /// Member counts are the room totals, not just the caller.
    async fn list_room_summaries_for_member(
        &self,
        user_id: &UserId,
    ) -> DirectoryResult<Vec<RoomSummary>>;
}

/// Write side of the room store
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Create a room; the creator becomes its first member
    async fn create_room(&self, new_room: NewRoom, creator: &UserId) -> Result<Room, RoomError>;

    /// Join a public room
    async fn join_room(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RoomError>;
}

/// Directory read errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// The store could not be reached or returned unusable data
    #[error("Room data unavailable: {0}")]
    DataUnavailable(String),
}
