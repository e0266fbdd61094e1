//! Conversation and message delivery tracker.
//!
//! Owns the send path for chat messages and every change to their
//! delivered/read state. Message and conversation writes are persisted
//! before anything is pushed.

use std::sync::Arc;

use pinpost_core::types::id::{ConversationId, MessageId, UserId};
use pinpost_core::{AppError, AppResult};
use pinpost_database::Stores;
use pinpost_entity::conversation::{Conversation, ParticipantDetail, ParticipantPair};
use pinpost_entity::message::{Message, MessageContent, MessageKind};
use pinpost_entity::user::UserProfile;

use super::preview::preview_text;
use crate::dispatch::Dispatcher;
use crate::message::types::OutboundEvent;
use crate::metrics::RealtimeMetrics;

/// Tracks conversations, unread counters, and message receipts.
#[derive(Debug)]
pub struct DeliveryTracker {
    stores: Stores,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<RealtimeMetrics>,
    preview_max_chars: usize,
}

impl DeliveryTracker {
    /// Create a new tracker
    pub fn new(
        stores: Stores,
        dispatcher: Arc<Dispatcher>,
        metrics: Arc<RealtimeMetrics>,
        preview_max_chars: usize,
    ) -> Self {
        Self {
            stores,
            dispatcher,
            metrics,
            preview_max_chars,
        }
    }

    /// Whether two users may message each other: they must follow each
    /// other. A user may always "message" themselves.
    pub async fn can_message(&self, a: UserId, b: UserId) -> AppResult<bool> {
        if a == b {
            return Ok(true);
        }
        self.is_mutual(a, b).await
    }

    async fn is_mutual(&self, a: UserId, b: UserId) -> AppResult<bool> {
        Ok(self.stores.follows.exists(a, b).await? && self.stores.follows.exists(b, a).await?)
    }

    /// Return the conversation between `a` and `b`, creating it if needed.
    ///
    /// Requires a mutual follow. The participant pair is order-independent
    /// and at most one conversation exists per pair.
    pub async fn get_or_create_conversation(&self, a: UserId, b: UserId) -> AppResult<Conversation> {
        let pair = ParticipantPair::new(a, b)
            .ok_or_else(|| AppError::eligibility("Cannot start a conversation with yourself"))?;

        let first = self.require_user(pair.first()).await?;
        let second = self.require_user(pair.second()).await?;

        if !self.is_mutual(a, b).await? {
            return Err(AppError::eligibility(
                "You can only message users who follow you back",
            ));
        }

        if let Some(existing) = self.stores.conversations.find_by_participants(&pair).await? {
            return Ok(existing);
        }

        let details = vec![ParticipantDetail::from(&first), ParticipantDetail::from(&second)];
        let conversation = self
            .stores
            .conversations
            .insert_if_absent(Conversation::new(pair, details))
            .await?;

        tracing::info!(
            conversation_id = %conversation.id,
            first = %pair.first(),
            second = %pair.second(),
            "Conversation ready"
        );
        Ok(conversation)
    }

    /// Persist a message, update the conversation, and push it to the
    /// other participant.
    ///
    /// The recipient is added to `delivered_to` before the push if they are
    /// online at that moment.
    pub async fn send_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: MessageContent,
    ) -> AppResult<Message> {
        let conversation = self.require_conversation(conversation_id).await?;
        if !conversation.is_participant(sender_id) {
            return Err(AppError::authorization(
                "Not a participant of this conversation",
            ));
        }
        validate_content(&content)?;
        let sender = self.require_user(sender_id).await?;

        let preview = preview_text(&content, self.preview_max_chars);
        let mut message = Message::new(conversation_id, &sender, content);
        self.stores.messages.insert(&message).await?;

        let recipients = conversation.recipients_of(sender_id);
        self.stores
            .conversations
            .record_message(conversation_id, &preview, message.created_at, &recipients)
            .await?;
        self.metrics.record_message();

        for &recipient in &recipients {
            if self.dispatcher.is_online(recipient)
                && self.stores.messages.add_delivered(message.id, recipient).await?
            {
                message.delivered_to.insert(recipient);
            }
        }

        for &recipient in &recipients {
            self.dispatcher
                .push(
                    recipient,
                    OutboundEvent::NewMessage {
                        message: message.clone(),
                    },
                )
                .await;
        }

        tracing::debug!(
            message_id = %message.id,
            conversation_id = %conversation_id,
            sender_id = %sender_id,
            kind = message.content.kind.as_str(),
            delivered = message.delivered_to.len(),
            "Message sent"
        );
        Ok(message)
    }

    /// Add `user_id` to the message's `read_by` set.
    ///
    /// Idempotent. Returns `true` if the set changed, in which case the
    /// sender receives a `message_status` update.
    pub async fn mark_message_read(&self, message_id: MessageId, user_id: UserId) -> AppResult<bool> {
        let message = self
            .stores
            .messages
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Message {message_id} not found")))?;
        let conversation = self.require_conversation(message.conversation_id).await?;
        if !conversation.is_participant(user_id) {
            return Err(AppError::authorization(
                "Not a participant of this conversation",
            ));
        }

        if !self.stores.messages.add_read(message_id, user_id).await? {
            return Ok(false);
        }

        let mut updated = message;
        updated.read_by.insert(user_id);
        self.dispatcher
            .push(updated.sender_id, OutboundEvent::message_status(&updated))
            .await;
        Ok(true)
    }

    /// Mark every message from the other participant as read by `user_id`
    /// and reset their unread counter.
    ///
    /// Returns the number of messages that changed.
    pub async fn mark_conversation_read(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> AppResult<usize> {
        let conversation = self.require_conversation(conversation_id).await?;
        if !conversation.is_participant(user_id) {
            return Err(AppError::authorization(
                "Not a participant of this conversation",
            ));
        }

        let updated = self
            .stores
            .messages
            .mark_conversation_read(conversation_id, user_id)
            .await?;
        self.stores
            .conversations
            .reset_unread(conversation_id, user_id)
            .await?;

        for message in &updated {
            self.dispatcher
                .push(message.sender_id, OutboundEvent::message_status(message))
                .await;
        }

        tracing::debug!(
            conversation_id = %conversation_id,
            user_id = %user_id,
            updated = updated.len(),
            "Conversation marked read"
        );
        Ok(updated.len())
    }

    /// Sum of the user's unread counters across all conversations.
    pub async fn unread_total(&self, user_id: UserId) -> AppResult<u64> {
        Ok(self
            .conversations_for(user_id)
            .await?
            .iter()
            .map(|conversation| u64::from(conversation.unread_for(user_id)))
            .sum())
    }

    /// The user's conversations, most recently updated first.
    pub async fn conversations_for(&self, user_id: UserId) -> AppResult<Vec<Conversation>> {
        self.stores.conversations.find_for_user(user_id).await
    }

    /// Messages of a conversation, oldest first. Only participants may read.
    pub async fn messages_in(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> AppResult<Vec<Message>> {
        let conversation = self.require_conversation(conversation_id).await?;
        if !conversation.is_participant(user_id) {
            return Err(AppError::authorization(
                "Not a participant of this conversation",
            ));
        }
        self.stores.messages.find_by_conversation(conversation_id).await
    }

    async fn require_conversation(&self, id: ConversationId) -> AppResult<Conversation> {
        self.stores
            .conversations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Conversation {id} not found")))
    }

    async fn require_user(&self, id: UserId) -> AppResult<UserProfile> {
        self.stores
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}

/// Text messages need a body; media messages need a URL.
fn validate_content(content: &MessageContent) -> AppResult<()> {
    match content.kind {
        MessageKind::Text if content.text.trim().is_empty() => {
            Err(AppError::validation("Message text cannot be empty"))
        }
        MessageKind::Image | MessageKind::Voice
            if content.media_url.as_deref().is_none_or(str::is_empty) =>
        {
            Err(AppError::validation(format!(
                "{} messages require a media URL",
                content.kind.as_str()
            )))
        }
        _ => Ok(()),
    }
}
