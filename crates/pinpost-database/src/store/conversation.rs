//! Conversation collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pinpost_core::result::AppResult;
use pinpost_core::types::id::{ConversationId, UserId};
use pinpost_entity::conversation::{Conversation, ParticipantPair};

/// Persistence for 1:1 conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a conversation by primary key.
    async fn find_by_id(&self, id: ConversationId) -> AppResult<Option<Conversation>>;

    /// Find the conversation for a canonical participant pair.
    async fn find_by_participants(&self, pair: &ParticipantPair) -> AppResult<Option<Conversation>>;

    /// Insert `conversation` unless one already exists for its pair.
    ///
    /// Returns whichever conversation is stored for the pair afterwards.
    /// Implementations must make the check and the insert atomic (a unique
    /// index on the pair in a document store).
    async fn insert_if_absent(&self, conversation: Conversation) -> AppResult<Conversation>;

    /// All conversations `user_id` takes part in, most recently updated first.
    async fn find_for_user(&self, user_id: UserId) -> AppResult<Vec<Conversation>>;

    /// Set the last-message preview and increment unread for `recipients`.
    async fn record_message(
        &self,
        id: ConversationId,
        preview: &str,
        sent_at: DateTime<Utc>,
        recipients: &[UserId],
    ) -> AppResult<()>;

    /// Reset the unread counter of `user_id` to zero.
    async fn reset_unread(&self, id: ConversationId, user_id: UserId) -> AppResult<()>;
}
