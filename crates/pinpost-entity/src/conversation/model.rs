//! Conversation model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pinpost_core::types::id::{ConversationId, UserId};

use super::pair::ParticipantPair;
use crate::user::UserProfile;

/// Display details of a participant, captured when the conversation is
/// created and not kept in sync afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDetail {
    /// Participant user ID.
    pub user_id: UserId,
    /// Username at creation time.
    pub username: String,
    /// Avatar at creation time.
    pub avatar: String,
}

impl From<&UserProfile> for ParticipantDetail {
    fn from(user: &UserProfile) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// A 1:1 conversation between two users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: ConversationId,
    /// The two participants in canonical order.
    pub participants: ParticipantPair,
    /// Participant display snapshot.
    pub participant_details: Vec<ParticipantDetail>,
    /// Preview of the most recent message.
    pub last_message: Option<String>,
    /// When the most recent message was sent.
    pub last_message_at: Option<DateTime<Utc>>,
    /// Unread message count per participant.
    pub unread_count: BTreeMap<UserId, u32>,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation last changed.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Start an empty conversation between two users.
    pub fn new(participants: ParticipantPair, details: Vec<ParticipantDetail>) -> Self {
        let now = Utc::now();
        let unread_count = participants
            .as_array()
            .into_iter()
            .map(|user_id| (user_id, 0))
            .collect();

        Self {
            id: ConversationId::new(),
            participants,
            participant_details: details,
            last_message: None,
            last_message_at: None,
            unread_count,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` takes part in this conversation.
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.participants.contains(user_id)
    }

    /// Every participant except `user_id`. Empty when `user_id` is not a participant.
    pub fn recipients_of(&self, user_id: UserId) -> Vec<UserId> {
        self.participants.other(user_id).into_iter().collect()
    }

    /// Unread count for a participant (zero if never set).
    pub fn unread_for(&self, user_id: UserId) -> u32 {
        self.unread_count.get(&user_id).copied().unwrap_or(0)
    }
}
