//! In-memory room directory
//!
//! Keeps rooms and memberships in process. Used by tests and by callers that
//! do not need durable storage. Reads can be switched off with
//! [`InMemoryRoomDirectory::set_available`] to exercise the failure policy.

use super::directory::{DirectoryError, DirectoryResult, RoomDirectory, RoomRegistry};
use super::room::{NewRoom, Room, RoomError};
use super::summary::RoomSummary;
use super::types::{RoomId, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct DirectoryState {
    rooms: HashMap<RoomId, Room>,
    /// One entry per (room, member) pair
    memberships: HashSet<(RoomId, UserId)>,
}

impl DirectoryState {
    fn member_counts(&self) -> HashMap<&RoomId, u64> {
        let mut counts = HashMap::new();
        for (room_id, _) in &self.memberships {
            *counts.entry(room_id).or_insert(0) += 1;
        }
        counts
    }

    fn summaries<F>(&self, mut include: F) -> Vec<RoomSummary>
    where
        F: FnMut(&Room) -> bool,
    {
        let counts = self.member_counts();
        let mut summaries: Vec<RoomSummary> = self
            .rooms
            .values()
            .filter(|room| include(room))
            .map(|room| {
                RoomSummary::new(
                    room.id.clone(),
                    room.name.clone(),
                    counts.get(&room.id).copied().unwrap_or(0),
                )
            })
            .collect();
        summaries.sort_by(RoomSummary::listing_order);
        summaries
    }

    fn add_membership(&mut self, room_id: &RoomId, user_id: &UserId) -> Result<(), RoomError> {
        if !self.rooms.contains_key(room_id) {
            return Err(RoomError::RoomNotFound(room_id.clone()));
        }
        if !self.memberships.insert((room_id.clone(), user_id.clone())) {
            return Err(RoomError::AlreadyMember(room_id.clone()));
        }
        Ok(())
    }
}

/// Room directory backed by process memory
#[derive(Debug)]
pub struct InMemoryRoomDirectory {
    state: RwLock<DirectoryState>,
    available: AtomicBool,
}

impl InMemoryRoomDirectory {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DirectoryState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Make subsequent reads fail with `DataUnavailable` (or recover)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Insert an already-built room without adding any member
    pub async fn insert_room(&self, room: Room) {
        self.state.write().await.rooms.insert(room.id.clone(), room);
    }

    /// Record a membership regardless of room visibility.
    ///
    /// This is how private rooms gain members (invites happen elsewhere);
    /// [`RoomRegistry::join_room`] is the public-only path.
    pub async fn add_membership(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RoomError> {
        self.state.write().await.add_membership(room_id, user_id)
    }

    pub async fn room_count(&self) -> usize {
        self.state.read().await.rooms.len()
    }

    fn ensure_available(&self) -> DirectoryResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DirectoryError::DataUnavailable(
                "in-memory directory is marked unavailable".to_string(),
            ))
        }
    }
}

impl Default for InMemoryRoomDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomDirectory for InMemoryRoomDirectory {
    async fn list_public_room_summaries(&self) -> DirectoryResult<Vec<RoomSummary>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.summaries(|room| room.is_public()))
    }

    async fn list_room_summaries_for_member(
        &self,
        user_id: &UserId,
    ) -> DirectoryResult<Vec<RoomSummary>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        let member_of: HashSet<&RoomId> = state
            .memberships
            .iter()
            .filter(|(_, member)| member == user_id)
            .map(|(room_id, _)| room_id)
            .collect();
        Ok(state.summaries(|room| member_of.contains(&room.id)))
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomDirectory {
    async fn create_room(&self, new_room: NewRoom, creator: &UserId) -> Result<Room, RoomError> {
        let room = Room::from_new(new_room);
        let mut state = self.state.write().await;
        state.rooms.insert(room.id.clone(), room.clone());
        state.add_membership(&room.id, creator)?;

        debug!(room = %room.id, name = %room.name, creator = %creator, "Created room");
        Ok(room)
    }

    async fn join_room(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RoomError> {
        let mut state = self.state.write().await;
        let room = state
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;

        if state.memberships.contains(&(room_id.clone(), user_id.clone())) {
            return Err(RoomError::AlreadyMember(room_id.clone()));
        }
        if !room.is_public() {
            return Err(RoomError::NotJoinable(room_id.clone()));
        }

        state.add_membership(room_id, user_id)?;
        debug!(room = %room_id, user = %user_id, "Joined room");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_room::room::RoomVisibility;

    fn new_room(name: &str, is_public: bool) -> NewRoom {
        NewRoom::parse(name, is_public, 100).unwrap()
    }

    #[tokio::test]
    async fn test_create_room_adds_creator() {
        let directory = InMemoryRoomDirectory::new();
        let alice = UserId::from("alice");

        let room = directory.create_room(new_room("General", true), &alice).await.unwrap();
        assert_eq!(room.visibility, RoomVisibility::Public);

        let mine = directory.list_room_summaries_for_member(&alice).await.unwrap();
        assert_eq!(mine, vec![RoomSummary::new(room.id, "General", 1)]);
    }

    #[tokio::test]
    async fn test_public_listing_excludes_private_rooms() {
        let directory = InMemoryRoomDirectory::new();
        let alice = UserId::from("alice");

        directory.create_room(new_room("Secret", false), &alice).await.unwrap();
        directory.create_room(new_room("Lobby", true), &alice).await.unwrap();

        let public = directory.list_public_room_summaries().await.unwrap();
        let names: Vec<_> = public.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Lobby"]);
    }

    #[tokio::test]
    async fn test_join_room_rules() {
        let directory = InMemoryRoomDirectory::new();
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");

        let public = directory.create_room(new_room("Lobby", true), &alice).await.unwrap();
        let private = directory.create_room(new_room("Secret", false), &alice).await.unwrap();

        directory.join_room(&public.id, &bob).await.unwrap();
        assert!(matches!(
            directory.join_room(&public.id, &bob).await,
            Err(RoomError::AlreadyMember(_))
        ));
        assert!(matches!(
            directory.join_room(&private.id, &bob).await,
            Err(RoomError::NotJoinable(_))
        ));
        assert!(matches!(
            directory.join_room(&RoomId::from("missing"), &bob).await,
            Err(RoomError::RoomNotFound(_))
        ));

        let public_rooms = directory.list_public_room_summaries().await.unwrap();
        assert_eq!(public_rooms[0].member_count, 2);
    }

    #[tokio::test]
    async fn test_member_listing_counts_all_members() {
        let directory = InMemoryRoomDirectory::new();
        let alice = UserId::from("alice");
        let room = directory.create_room(new_room("Ops", false), &alice).await.unwrap();
        directory.add_membership(&room.id, &UserId::from("bob")).await.unwrap();
        directory.add_membership(&room.id, &UserId::from("carol")).await.unwrap();

        let rooms = directory.list_room_summaries_for_member(&alice).await.unwrap();
        assert_eq!(rooms[0].member_count, 3);
    }

    #[tokio::test]
    async fn test_unavailable_directory_fails_reads() {
        let directory = InMemoryRoomDirectory::new();
        directory.set_available(false);

        assert!(matches!(
            directory.list_public_room_summaries().await,
            Err(DirectoryError::DataUnavailable(_))
        ));
        assert!(directory
            .list_room_summaries_for_member(&UserId::from("alice"))
            .await
            .is_err());

        directory.set_available(true);
        assert!(directory.list_public_room_summaries().await.is_ok());
    }
}
