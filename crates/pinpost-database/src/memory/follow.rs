//! Directed follow edges.

use async_trait::async_trait;

use pinpost_core::result::AppResult;
use pinpost_core::types::id::UserId;

use super::MemoryStore;
use crate::store::FollowStore;

#[async_trait]
impl FollowStore for MemoryStore {
    async fn exists(&self, follower_id: UserId, following_id: UserId) -> AppResult<bool> {
        Ok(self.follows.contains(&(follower_id, following_id)))
    }
}
