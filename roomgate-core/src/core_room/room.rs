//! Room data structures and the creation request

use super::types::RoomId;
use serde::{Deserialize, Serialize};

/// Default upper bound on a room name, in characters
pub const DEFAULT_MAX_NAME_LENGTH: usize = 100;

/// A named chat room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier
    pub id: RoomId,

    /// Display name (trimmed, never empty)
    pub name: String,

    /// Visibility mode (public or private)
    pub visibility: RoomVisibility,
}

impl Room {
    /// Build a Room from a validated creation request
    pub fn from_new(new_room: NewRoom) -> Self {
        Room {
            id: RoomId::generate(),
            name: new_room.name,
            visibility: new_room.visibility,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == RoomVisibility::Public
    }
}

/// Room visibility modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomVisibility {
    /// Listed for every signed-in user, anyone can join
    Public,
    /// Only visible to its members
    Private,
}

impl RoomVisibility {
    pub fn from_public_flag(is_public: bool) -> Self {
        if is_public {
            RoomVisibility::Public
        } else {
            RoomVisibility::Private
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomVisibility::Public => "Public",
            RoomVisibility::Private => "Private",
        }
    }
}

/// A validated request to create a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    name: String,
    visibility: RoomVisibility,
}

impl NewRoom {
    /// Validate raw form input.
    ///
    /// The name is trimmed before checking; it must be non-empty and at most
    /// `max_name_length` characters.
    pub fn parse(name: &str, is_public: bool, max_name_length: usize) -> Result<Self, RoomError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoomError::EmptyName);
        }

        let length = name.chars().count();
        if length > max_name_length {
            return Err(RoomError::NameTooLong {
                length,
                max: max_name_length,
            });
        }

        Ok(Self {
            name: name.to_string(),
            visibility: RoomVisibility::from_public_flag(is_public),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> RoomVisibility {
        self.visibility
    }
}

/// Room write-path errors
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room name must not be empty")]
    EmptyName,

    #[error("Room name is {length} characters, maximum is {max}")]
    NameTooLong { length: usize, max: usize },

    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("User is already a member of room {0}")]
    AlreadyMember(RoomId),

    #[error("Room {0} is private and cannot be joined directly")]
    NotJoinable(RoomId),

    #[error("Storage error: {0}")]
    Storage(String),
}
