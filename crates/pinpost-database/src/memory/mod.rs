//! In-memory record store backed by `dashmap`.
//!
//! Every per-record mutation goes through a `DashMap` entry or `get_mut`
//! guard, which holds the shard lock for the duration of the update. That
//! makes set inserts and counter increments atomic per record.

mod conversation;
mod follow;
mod message;
mod notification;
mod user;

use dashmap::{DashMap, DashSet};
use tracing::debug;

use pinpost_core::types::id::{ConversationId, MessageId, UserId};
use pinpost_entity::conversation::{Conversation, ParticipantPair};
use pinpost_entity::follow::Follow;
use pinpost_entity::message::Message;
use pinpost_entity::notification::NotificationRecord;
use pinpost_entity::user::UserProfile;

/// Single-node store holding every collection in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// User ID → profile.
    users: DashMap<UserId, UserProfile>,
    /// (follower, following) edges.
    follows: DashSet<(UserId, UserId)>,
    /// Conversation ID → conversation.
    conversations: DashMap<ConversationId, Conversation>,
    /// Canonical pair → conversation ID (unique index).
    conversations_by_pair: DashMap<ParticipantPair, ConversationId>,
    /// Message ID → message.
    messages: DashMap<MessageId, Message>,
    /// Conversation ID → message IDs in insertion order.
    messages_by_conversation: DashMap<ConversationId, Vec<MessageId>>,
    /// Recipient → notification records in insertion order.
    notifications: DashMap<UserId, Vec<NotificationRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user profile.
    pub fn insert_user(&self, user: UserProfile) {
        debug!(user_id = %user.id, "Stored user profile");
        self.users.insert(user.id, user);
    }

    /// Record a follow edge.
    pub fn insert_follow(&self, follow: Follow) {
        self.follows.insert((follow.follower_id, follow.following_id));
    }

    /// Remove a follow edge. Returns `true` if it existed.
    pub fn remove_follow(&self, follower_id: UserId, following_id: UserId) -> bool {
        self.follows.remove(&(follower_id, following_id)).is_some()
    }
}
