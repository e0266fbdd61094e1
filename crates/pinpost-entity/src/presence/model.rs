//! Presence state value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pinpost_core::types::id::UserId;

/// In-memory presence record for a user who connected during this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPresence {
    /// User ID.
    pub user_id: UserId,
    /// Whether a live channel is currently registered.
    pub online: bool,
    /// Time of the last connect or disconnect transition.
    pub last_seen: DateTime<Utc>,
    /// Time of the most recent connect.
    pub connected_at: DateTime<Utc>,
}

impl UserPresence {
    /// Record for a user who just connected.
    pub fn connected(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            online: true,
            last_seen: now,
            connected_at: now,
        }
    }

    /// Public view of this record.
    pub fn status(&self) -> PresenceStatus {
        PresenceStatus {
            online: self.online,
            last_seen: Some(self.last_seen),
        }
    }
}

/// Online flag and last-seen time as reported to other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceStatus {
    /// Whether the user is reachable right now.
    pub online: bool,
    /// Last known transition time, if any.
    pub last_seen: Option<DateTime<Utc>>,
}

impl PresenceStatus {
    /// Status of a user nobody has any record of.
    pub fn unknown() -> Self {
        Self {
            online: false,
            last_seen: None,
        }
    }
}
