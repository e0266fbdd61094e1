//! Conversation records, keyed by id and indexed by participant pair.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;

use pinpost_core::error::AppError;
use pinpost_core::result::AppResult;
use pinpost_core::types::id::{ConversationId, UserId};
use pinpost_entity::conversation::{Conversation, ParticipantPair};

use super::MemoryStore;
use crate::store::ConversationStore;

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn find_by_id(&self, id: ConversationId) -> AppResult<Option<Conversation>> {
        Ok(self.conversations.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_participants(&self, pair: &ParticipantPair) -> AppResult<Option<Conversation>> {
        let Some(id) = self.conversations_by_pair.get(pair).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        ConversationStore::find_by_id(self, id).await
    }

    async fn insert_if_absent(&self, conversation: Conversation) -> AppResult<Conversation> {
        // The pair entry stays locked until the conversation itself is stored.
        match self.conversations_by_pair.entry(conversation.participants) {
            Entry::Occupied(existing) => self
                .conversations
                .get(existing.get())
                .map(|entry| entry.value().clone())
                .ok_or_else(|| AppError::internal("Conversation index points at a missing record")),
            Entry::Vacant(slot) => {
                self.conversations.insert(conversation.id, conversation.clone());
                slot.insert(conversation.id);
                Ok(conversation)
            }
        }
    }

    async fn find_for_user(&self, user_id: UserId) -> AppResult<Vec<Conversation>> {
        let mut found: Vec<Conversation> = self
            .conversations
            .iter()
            .filter(|entry| entry.value().is_participant(user_id))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    async fn record_message(
        &self,
        id: ConversationId,
        preview: &str,
        sent_at: DateTime<Utc>,
        recipients: &[UserId],
    ) -> AppResult<()> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Conversation {id} not found")))?;

        conversation.last_message = Some(preview.to_string());
        conversation.last_message_at = Some(sent_at);
        conversation.updated_at = sent_at;
        for recipient in recipients {
            *conversation.unread_count.entry(*recipient).or_insert(0) += 1;
        }
        Ok(())
    }

    async fn reset_unread(&self, id: ConversationId, user_id: UserId) -> AppResult<()> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Conversation {id} not found")))?;

        conversation.unread_count.insert(user_id, 0);
        Ok(())
    }
}
