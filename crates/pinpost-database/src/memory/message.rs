//! Message records and their delivered/read sets.

use async_trait::async_trait;

use pinpost_core::error::AppError;
use pinpost_core::result::AppResult;
use pinpost_core::types::id::{ConversationId, MessageId, UserId};
use pinpost_entity::message::Message;

use super::MemoryStore;
use crate::store::MessageStore;

#[async_trait]
impl MessageStore for MemoryStore {
    async fn find_by_id(&self, id: MessageId) -> AppResult<Option<Message>> {
        Ok(self.messages.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, message: &Message) -> AppResult<()> {
        self.messages.insert(message.id, message.clone());
        self.messages_by_conversation
            .entry(message.conversation_id)
            .or_default()
            .push(message.id);
        Ok(())
    }

    async fn add_delivered(&self, id: MessageId, user_id: UserId) -> AppResult<bool> {
        let mut message = self
            .messages
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Message {id} not found")))?;
        Ok(message.delivered_to.insert(user_id))
    }

    async fn add_read(&self, id: MessageId, user_id: UserId) -> AppResult<bool> {
        let mut message = self
            .messages
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Message {id} not found")))?;
        Ok(message.read_by.insert(user_id))
    }

    async fn mark_conversation_read(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> AppResult<Vec<Message>> {
        let ids = self
            .messages_by_conversation
            .get(&conversation_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        let mut updated = Vec::new();
        for id in ids {
            if let Some(mut message) = self.messages.get_mut(&id) {
                if message.sender_id != user_id && message.read_by.insert(user_id) {
                    updated.push(message.clone());
                }
            }
        }
        Ok(updated)
    }

    async fn find_by_conversation(&self, conversation_id: ConversationId) -> AppResult<Vec<Message>> {
        let ids = self
            .messages_by_conversation
            .get(&conversation_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        Ok(ids
            .iter()
            .filter_map(|id| self.messages.get(id).map(|entry| entry.value().clone()))
            .collect())
    }
}
