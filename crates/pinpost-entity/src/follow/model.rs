//! Follow relationship model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pinpost_core::types::id::UserId;

/// A directed "follower follows following" edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    /// The user who follows.
    pub follower_id: UserId,
    /// The user being followed.
    pub following_id: UserId,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// Create a follow edge timestamped now.
    pub fn new(follower_id: UserId, following_id: UserId) -> Self {
        Self {
            follower_id,
            following_id,
            created_at: Utc::now(),
        }
    }
}
