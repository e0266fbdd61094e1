//! Chat message model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pinpost_core::types::id::{ConversationId, MessageId, UserId};

use super::kind::MessageKind;
use crate::user::UserProfile;

/// What the sender submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Payload type.
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    /// Text body (may be empty for media messages).
    #[serde(rename = "content", default)]
    pub text: String,
    /// Media URL for image and voice messages.
    pub media_url: Option<String>,
}

impl MessageContent {
    /// A text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            text: text.into(),
            media_url: None,
        }
    }

    /// An image message with an optional caption.
    pub fn image(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Image,
            text: caption.into(),
            media_url: Some(url.into()),
        }
    }

    /// A voice message.
    pub fn voice(url: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Voice,
            text: String::new(),
            media_url: Some(url.into()),
        }
    }
}

/// A message inside a conversation, with live delivery and read sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Owning conversation.
    pub conversation_id: ConversationId,
    /// Author.
    pub sender_id: UserId,
    /// Author username at send time.
    pub sender_username: String,
    /// Author avatar at send time.
    pub sender_avatar: String,
    /// Payload.
    #[serde(flatten)]
    pub content: MessageContent,
    /// Users whose live channel received the message.
    pub delivered_to: BTreeSet<UserId>,
    /// Users who acknowledged the message. Always contains the sender.
    pub read_by: BTreeSet<UserId>,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a new message from `sender`, read by the sender and delivered
    /// to nobody yet.
    pub fn new(conversation_id: ConversationId, sender: &UserProfile, content: MessageContent) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender_id: sender.id,
            sender_username: sender.username.clone(),
            sender_avatar: sender.avatar.clone(),
            content,
            delivered_to: BTreeSet::new(),
            read_by: BTreeSet::from([sender.id]),
            created_at: Utc::now(),
        }
    }

    /// Whether `user_id` has read the message.
    pub fn is_read_by(&self, user_id: UserId) -> bool {
        self.read_by.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_is_read_by_sender_only() {
        let sender = UserProfile::new(UserId::new(), "alice");
        let message = Message::new(ConversationId::new(), &sender, MessageContent::text("hi"));

        assert!(message.delivered_to.is_empty());
        assert_eq!(message.read_by.len(), 1);
        assert!(message.is_read_by(sender.id));
    }

    #[test]
    fn test_content_flattens_with_type_discriminator() {
        let sender = UserProfile::new(UserId::new(), "alice");
        let message = Message::new(
            ConversationId::new(),
            &sender,
            MessageContent::voice("https://cdn.example/v.ogg"),
        );

        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value["type"], "voice");
        assert_eq!(value["content"], "");
        assert_eq!(value["media_url"], "https://cdn.example/v.ogg");
    }
}
