//! Message collection.

use async_trait::async_trait;

use pinpost_core::result::AppResult;
use pinpost_core::types::id::{ConversationId, MessageId, UserId};
use pinpost_entity::message::Message;

/// Persistence for chat messages and their delivered/read sets.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a message by primary key.
    async fn find_by_id(&self, id: MessageId) -> AppResult<Option<Message>>;

    /// Insert a new message.
    async fn insert(&self, message: &Message) -> AppResult<()>;

    /// Add `user_id` to `delivered_to`. Returns `true` if it was absent.
    async fn add_delivered(&self, id: MessageId, user_id: UserId) -> AppResult<bool>;

    /// Add `user_id` to `read_by`. Returns `true` if it was absent.
    async fn add_read(&self, id: MessageId, user_id: UserId) -> AppResult<bool>;

    /// Add `user_id` to `read_by` on every message of the conversation that
    /// was sent by someone else and not yet read. Returns the updated messages.
    async fn mark_conversation_read(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> AppResult<Vec<Message>>;

    /// Messages of a conversation, oldest first.
    async fn find_by_conversation(&self, conversation_id: ConversationId) -> AppResult<Vec<Message>>;
}
