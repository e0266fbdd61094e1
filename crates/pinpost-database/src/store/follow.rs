//! Follow collection.

use async_trait::async_trait;

use pinpost_core::result::AppResult;
use pinpost_core::types::id::UserId;

/// Read access to follow edges.
#[async_trait]
pub trait FollowStore: Send + Sync + std::fmt::Debug + 'static {
    /// Whether `follower_id` follows `following_id`.
    async fn exists(&self, follower_id: UserId, following_id: UserId) -> AppResult<bool>;
}
