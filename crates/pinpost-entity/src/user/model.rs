//! User profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pinpost_core::types::id::UserId;

/// The subset of an account the real-time core reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier.
    pub id: UserId,
    /// Public username.
    pub username: String,
    /// Avatar URL (empty when unset).
    #[serde(default)]
    pub avatar: String,
    /// Last persisted online flag.
    #[serde(default)]
    pub online: bool,
    /// Last persisted time the user was seen.
    pub last_seen: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Create a profile with no persisted presence.
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            avatar: String::new(),
            online: false,
            last_seen: None,
        }
    }

    /// Set the avatar URL.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }
}
