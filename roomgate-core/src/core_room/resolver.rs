//! Room Access Resolver
//!
//! Splits the rooms visible to a signed-in user into the rooms they have
//! joined and the public rooms they could join. Private rooms are only ever
//! reached through the user's own memberships.
//!
//! ## Failure policy
//!
//! A directory read that fails or exceeds `read_timeout` is treated as an
//! empty result for that read. The caller always gets a [`RoomAccess`]; a
//! partial outage shows fewer rooms instead of failing the page.

use super::directory::{DirectoryError, DirectoryResult, RoomDirectory};
use super::summary::RoomSummary;
use super::types::{AuthenticatedUser, RoomId, UserId};
use crate::config::ResolverConfig;
use crate::metrics;
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const PUBLIC_READ: &str = "public_rooms";
const MEMBER_READ: &str = "member_rooms";

/// Rooms visible to one user, split by membership
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedRoomSet {
    /// Rooms the user is a member of
    pub joined: Vec<RoomSummary>,

    /// Public rooms the user is not a member of
    pub joinable_public: Vec<RoomSummary>,
}

impl ResolvedRoomSet {
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.joinable_public.is_empty()
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "rooms", rename_all = "snake_case")]
pub enum RoomAccess {
    /// Neither read produced any room
    Empty,
    /// At least one room was found
    Rooms(ResolvedRoomSet),
}

impl RoomAccess {
    pub fn is_empty(&self) -> bool {
        matches!(self, RoomAccess::Empty)
    }

    pub fn rooms(&self) -> Option<&ResolvedRoomSet> {
        match self {
            RoomAccess::Empty => None,
            RoomAccess::Rooms(set) => Some(set),
        }
    }

    /// Flatten into a room set; `Empty` becomes two empty lists
    pub fn into_room_set(self) -> ResolvedRoomSet {
        match self {
            RoomAccess::Empty => ResolvedRoomSet::default(),
            RoomAccess::Rooms(set) => set,
        }
    }

    fn outcome_label(&self) -> &'static str {
        match self {
            RoomAccess::Empty => "empty",
            RoomAccess::Rooms(_) => "rooms",
        }
    }
}

/// Partition directory results into joined and joinable rooms.
///
/// A room is joinable only when it is absent from `joined`, so a public room
/// the user belongs to is listed once, under `joined`. The order of each input
/// is kept.
pub fn partition(all_public: Vec<RoomSummary>, joined: Vec<RoomSummary>) -> RoomAccess {
    if all_public.is_empty() && joined.is_empty() {
        return RoomAccess::Empty;
    }

    let joined_ids: HashSet<&RoomId> = joined.iter().map(|room| &room.id).collect();
    let joinable_public: Vec<RoomSummary> = all_public
        .iter()
        .filter(|room| !joined_ids.contains(&room.id))
        .cloned()
        .collect();

    RoomAccess::Rooms(ResolvedRoomSet {
        joined,
        joinable_public,
    })
}

/// Resolves the rooms visible to a user against an injected directory
pub struct RoomAccessResolver<D: ?Sized> {
    directory: Arc<D>,
    config: ResolverConfig,
}

impl<D: ?Sized> Clone for RoomAccessResolver<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            config: self.config.clone(),
        }
    }
}

impl<D> RoomAccessResolver<D>
where
    D: RoomDirectory + ?Sized,
{
    pub fn new(directory: Arc<D>, config: ResolverConfig) -> Self {
        Self { directory, config }
    }

    /// Resolver with the default read timeout and concurrent reads
    pub fn with_defaults(directory: Arc<D>) -> Self {
        Self::new(directory, ResolverConfig::default())
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the joined and joinable rooms for `user`.
    ///
    /// Never fails: unavailable directory data shows up as missing rooms.
    pub async fn resolve(&self, user: &AuthenticatedUser) -> RoomAccess {
        let started = Instant::now();

        let (all_public, joined) = if self.config.concurrent_reads {
            tokio::join!(self.read_public(), self.read_joined(&user.id))
        } else {
            let all_public = self.read_public().await;
            let joined = self.read_joined(&user.id).await;
            (all_public, joined)
        };

        let public_count = all_public.len();
        let access = partition(all_public, joined);

        if let Some(set) = access.rooms() {
            debug!(
                user = %user.id,
                public = public_count,
                joined = set.joined.len(),
                joinable = set.joinable_public.len(),
                "Resolved rooms"
            );
        } else {
            debug!(user = %user.id, "No rooms visible");
        }

        metrics::resolution_completed(access.outcome_label(), started.elapsed());
        access
    }

    async fn read_public(&self) -> Vec<RoomSummary> {
        self.bounded_read(PUBLIC_READ, self.directory.list_public_room_summaries())
            .await
    }

    async fn read_joined(&self, user_id: &UserId) -> Vec<RoomSummary> {
        self.bounded_read(
            MEMBER_READ,
            self.directory.list_room_summaries_for_member(user_id),
        )
        .await
    }

    async fn bounded_read<F>(&self, read: &'static str, query: F) -> Vec<RoomSummary>
    where
        F: Future<Output = DirectoryResult<Vec<RoomSummary>>>,
    {
        let result = match tokio::time::timeout(self.config.read_timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(DirectoryError::DataUnavailable(format!(
                "no response within {:?}",
                self.config.read_timeout
            ))),
        };

        match result {
            Ok(rooms) => rooms,
            Err(e) => {
                warn!(read, error = %e, "Directory read failed, treating it as empty");
                metrics::directory_read_degraded(read);
                Vec::new()
            }
        }
    }
}
