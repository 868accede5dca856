//! Directory doubles for exercising the resolver's failure policy

use crate::core_room::{DirectoryError, DirectoryResult, RoomDirectory, RoomSummary, UserId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wraps a directory and can fail or delay each read independently
pub struct ScriptedDirectory<D> {
    inner: Arc<D>,
    fail_public: bool,
    fail_member: bool,
    public_delay: Option<Duration>,
    member_delay: Option<Duration>,
    public_calls: AtomicUsize,
    member_calls: AtomicUsize,
}

impl<D: RoomDirectory> ScriptedDirectory<D> {
    pub fn new(inner: Arc<D>) -> Self {
        Self {
            inner,
            fail_public: false,
            fail_member: false,
            public_delay: None,
            member_delay: None,
            public_calls: AtomicUsize::new(0),
            member_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_public(mut self) -> Self {
        self.fail_public = true;
        self
    }

    pub fn failing_member(mut self) -> Self {
        self.fail_member = true;
        self
    }

    pub fn delay_public(mut self, delay: Duration) -> Self {
        self.public_delay = Some(delay);
        self
    }

    pub fn delay_member(mut self, delay: Duration) -> Self {
        self.member_delay = Some(delay);
        self
    }

    pub fn public_calls(&self) -> usize {
        self.public_calls.load(Ordering::SeqCst)
    }

    pub fn member_calls(&self) -> usize {
        self.member_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<D: RoomDirectory> RoomDirectory for ScriptedDirectory<D> {
    async fn list_public_room_summaries(&self) -> DirectoryResult<Vec<RoomSummary>> {
        self.public_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.public_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_public {
            return Err(DirectoryError::DataUnavailable("scripted public failure".into()));
        }
        self.inner.list_public_room_summaries().await
    }

    async fn list_room_summaries_for_member(
        &self,
        user_id: &UserId,
    ) -> DirectoryResult<Vec<RoomSummary>> {
        self.member_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.member_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_member {
            return Err(DirectoryError::DataUnavailable("scripted member failure".into()));
        }
        self.inner.list_room_summaries_for_member(user_id).await
    }
}
