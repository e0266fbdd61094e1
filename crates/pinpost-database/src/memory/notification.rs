//! Persisted notification records, newest first per recipient.

use async_trait::async_trait;

use pinpost_core::result::AppResult;
use pinpost_core::types::id::UserId;
use pinpost_entity::notification::NotificationRecord;

use super::MemoryStore;
use crate::store::NotificationStore;

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert(&self, record: &NotificationRecord) -> AppResult<()> {
        self.notifications
            .entry(record.recipient_id)
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn find_for_recipient(&self, recipient_id: UserId) -> AppResult<Vec<NotificationRecord>> {
        Ok(self
            .notifications
            .get(&recipient_id)
            .map(|entry| entry.value().iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
