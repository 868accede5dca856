//! Test fixtures for building room directories
//!
//! Provides a builder that seeds an [`InMemoryRoomDirectory`] with rooms and
//! memberships under deterministic ids.

use crate::core_room::{
    AuthenticatedUser, InMemoryRoomDirectory, Room, RoomId, RoomVisibility, UserId,
};
use std::collections::HashMap;
use std::sync::Arc;

struct RoomSeed {
    name: String,
    visibility: RoomVisibility,
    members: Vec<UserId>,
}

/// Builder for a directory pre-populated with rooms
#[derive(Default)]
pub struct TestWorldBuilder {
    rooms: Vec<RoomSeed>,
}

/// A seeded directory plus the ids assigned to each room, in insertion order
pub struct TestWorld {
    pub directory: Arc<InMemoryRoomDirectory>,
    pub room_ids: Vec<RoomId>,
    by_name: HashMap<String, RoomId>,
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(self, name: &str, members: &[&str]) -> Self {
        self.room(name, RoomVisibility::Public, members)
    }

    pub fn private(self, name: &str, members: &[&str]) -> Self {
        self.room(name, RoomVisibility::Private, members)
    }

    pub fn room(mut self, name: &str, visibility: RoomVisibility, members: &[&str]) -> Self {
        self.rooms.push(RoomSeed {
            name: name.to_string(),
            visibility,
            members: members.iter().map(|m| UserId::from(*m)).collect(),
        });
        self
    }

    pub async fn build(self) -> TestWorld {
        let directory = Arc::new(InMemoryRoomDirectory::new());
        let mut room_ids = Vec::new();
        let mut by_name = HashMap::new();

        for (index, seed) in self.rooms.into_iter().enumerate() {
            let id = RoomId::new(format!("room-{:03}", index));
            directory
                .insert_room(Room {
                    id: id.clone(),
                    name: seed.name.clone(),
                    visibility: seed.visibility,
                })
                .await;
            for member in &seed.members {
                directory
                    .add_membership(&id, member)
                    .await
                    .expect("fixture memberships must be unique");
            }
            by_name.entry(seed.name).or_insert_with(|| id.clone());
            room_ids.push(id);
        }

        TestWorld {
            directory,
            room_ids,
            by_name,
        }
    }
}

impl TestWorld {
    /// Id of the first room seeded with `name`
    pub fn id_of(&self, name: &str) -> RoomId {
        self.by_name
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("no room named {}", name))
    }
}

pub fn test_user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(UserId::from(id))
}
