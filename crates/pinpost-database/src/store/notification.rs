//! Notification collection.

use async_trait::async_trait;

use pinpost_core::result::AppResult;
use pinpost_core::types::id::UserId;
use pinpost_entity::notification::NotificationRecord;

/// Persistence for notification records.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new notification record.
    async fn insert(&self, record: &NotificationRecord) -> AppResult<()>;

    /// Notifications addressed to `recipient_id`, newest first.
    async fn find_for_recipient(&self, recipient_id: UserId) -> AppResult<Vec<NotificationRecord>>;
}
