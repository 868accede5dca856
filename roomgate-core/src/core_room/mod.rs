//! Room access
//!
//! Decides which chat rooms a signed-in user can see and splits them into
//! joined rooms and joinable public rooms, each with a live member count.
//!
//! ## Architecture
//!
//! - **RoomDirectory**: read-only queries over rooms and memberships
//! - **RoomAccessResolver**: partitions directory results per user
//! - **HomeGate**: refuses to resolve without a signed-in user
//! - **RoomRegistry**: room creation and joining (write side)
//!
//! ## Visibility rules
//!
//! 1. A room the user belongs to is listed under `joined`, public or not
//! 2. A public room the user does not belong to is listed as joinable
//! 3. A private room the user does not belong to is never listed

pub mod directory;
pub mod identity;
pub mod memory;
pub mod resolver;
pub mod room;
pub mod storage;
pub mod summary;
pub mod types;

#[cfg(test)]
mod tests;

pub use directory::{DirectoryError, DirectoryResult, RoomDirectory, RoomRegistry};
pub use identity::{HomeGate, HomeView, IdentityProvider, StaticIdentity};
pub use memory::InMemoryRoomDirectory;
pub use resolver::{partition, ResolvedRoomSet, RoomAccess, RoomAccessResolver};
pub use room::{NewRoom, Room, RoomError, RoomVisibility};
pub use storage::{SqlRoomDirectory, StoreError};
pub use summary::RoomSummary;
pub use types::{AuthenticatedUser, RoomId, UserId};
