//! Inbound and outbound live-channel message type definitions.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pinpost_core::types::id::{ConversationId, MessageId, UserId};
use pinpost_entity::message::Message;
use pinpost_entity::notification::NotificationRecord;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Application-level keepalive; answered with `pong`.
    Ping,
    /// Typing indicator update for a conversation.
    Typing {
        /// Conversation the user is typing in.
        conversation_id: ConversationId,
        /// Whether the user is typing.
        #[serde(default)]
        typing: bool,
    },
}

/// Events pushed by the server to a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// A user came online or went offline.
    UserStatus {
        /// User whose presence changed.
        user_id: UserId,
        /// New online flag.
        online: bool,
        /// Transition time.
        last_seen: DateTime<Utc>,
    },
    /// A conversation participant started or stopped typing.
    Typing {
        /// Conversation ID.
        conversation_id: ConversationId,
        /// Typing user.
        user_id: UserId,
        /// Whether the user is typing.
        typing: bool,
    },
    /// A message arrived in one of the recipient's conversations.
    NewMessage {
        /// The persisted message.
        message: Message,
    },
    /// Delivered/read state of a message the recipient sent changed.
    MessageStatus {
        /// Message ID.
        message_id: MessageId,
        /// Conversation ID.
        conversation_id: ConversationId,
        /// Users the message was delivered to.
        delivered_to: BTreeSet<UserId>,
        /// Users who read the message.
        read_by: BTreeSet<UserId>,
    },
    /// A notification was created for the recipient.
    Notification {
        /// The persisted notification record.
        notification: NotificationRecord,
    },
    /// Reply to a client `ping`.
    Pong,
    /// The client sent something the server could not handle.
    Error {
        /// Machine-readable error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl OutboundEvent {
    /// Build a presence-changed event.
    pub fn user_status(user_id: UserId, online: bool, last_seen: DateTime<Utc>) -> Self {
        Self::UserStatus {
            user_id,
            online,
            last_seen,
        }
    }

    /// Build a receipt event from the current state of a message.
    pub fn message_status(message: &Message) -> Self {
        Self::MessageStatus {
            message_id: message.id,
            conversation_id: message.conversation_id,
            delivered_to: message.delivered_to.clone(),
            read_by: message.read_by.clone(),
        }
    }

    /// The `type` discriminator, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserStatus { .. } => "user_status",
            Self::Typing { .. } => "typing",
            Self::NewMessage { .. } => "new_message",
            Self::MessageStatus { .. } => "message_status",
            Self::Notification { .. } => "notification",
            Self::Pong => "pong",
            Self::Error { .. } => "error",
        }
    }
}
