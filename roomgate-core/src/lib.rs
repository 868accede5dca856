pub mod config;
pub mod core_room;
pub mod logging;
pub mod metrics;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use core_room::{
    AuthenticatedUser, HomeGate, HomeView, InMemoryRoomDirectory, RoomAccess, RoomAccessResolver,
    RoomDirectory, RoomRegistry, RoomSummary, SqlRoomDirectory, UserId,
};
pub use logging::{init_logging, LogLevel};
