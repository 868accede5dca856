//! Identity collaborator and the signed-in entry gate

use super::directory::RoomDirectory;
use super::resolver::{ResolvedRoomSet, RoomAccess, RoomAccessResolver};
use super::types::{AuthenticatedUser, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Supplies the currently signed-in user, if any
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Option<AuthenticatedUser>;
}

/// Identity provider with a fixed answer
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<AuthenticatedUser>,
}

impl StaticIdentity {
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user: Some(AuthenticatedUser::new(user_id)),
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// Signed in when `user_id` is present and not blank
    pub fn from_optional(user_id: Option<String>) -> Self {
        match user_id {
            Some(id) if !id.trim().is_empty() => Self::signed_in(UserId(id.trim().to_string())),
            _ => Self::anonymous(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Option<AuthenticatedUser> {
        self.user.clone()
    }
}

/// What the home view should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeView {
    /// Nobody is signed in; send the caller to the login flow
    RedirectToLogin,
    /// Signed in, but there are no rooms to show
    Empty,
    /// Signed in with rooms to list
    Rooms(ResolvedRoomSet),
}

/// Entry point for the room listing: checks identity before resolving.
pub struct HomeGate<I: ?Sized, D: ?Sized> {
    identity: Arc<I>,
    resolver: RoomAccessResolver<D>,
}

impl<I, D> HomeGate<I, D>
where
    I: IdentityProvider + ?Sized,
    D: RoomDirectory + ?Sized,
{
    pub fn new(identity: Arc<I>, resolver: RoomAccessResolver<D>) -> Self {
        Self { identity, resolver }
    }

    /// Resolve the home view; the resolver is not touched without a user
    pub async fn open(&self) -> HomeView {
        let Some(user) = self.identity.current_user().await else {
            debug!("No signed-in user, redirecting to login");
            return HomeView::RedirectToLogin;
        };

        match self.resolver.resolve(&user).await {
            RoomAccess::Empty => HomeView::Empty,
            RoomAccess::Rooms(set) => HomeView::Rooms(set),
        }
    }
}
