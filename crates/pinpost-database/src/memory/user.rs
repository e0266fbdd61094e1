//! User profiles.

use async_trait::async_trait;

use pinpost_core::result::AppResult;
use pinpost_core::types::id::UserId;
use pinpost_entity::user::UserProfile;

use super::MemoryStore;
use crate::store::UserStore;

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }
}
