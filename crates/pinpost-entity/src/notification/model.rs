//! Notification record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pinpost_core::types::id::{CommentId, NotificationId, PostId, UserId};

use super::kind::{NotificationKind, SubjectKind};

/// Reference to the post or blog a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
    /// Post or blog ID.
    pub id: PostId,
    /// Which collection the ID belongs to.
    pub kind: SubjectKind,
}

impl SubjectRef {
    /// Reference a short post.
    pub fn post(id: PostId) -> Self {
        Self {
            id,
            kind: SubjectKind::Post,
        }
    }

    /// Reference a blog post.
    pub fn blog(id: PostId) -> Self {
        Self {
            id,
            kind: SubjectKind::Blog,
        }
    }
}

/// A notification delivered to one recipient.
///
/// The real-time core only creates and pushes these; the read flag is
/// changed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The user who receives the notification.
    pub recipient_id: UserId,
    /// What happened.
    pub kind: NotificationKind,
    /// The user who caused it.
    pub actor_id: UserId,
    /// Actor display name at emit time.
    pub actor_display: String,
    /// Post or blog the event concerns.
    pub subject: Option<SubjectRef>,
    /// Comment the event concerns.
    pub related_comment_id: Option<CommentId>,
    /// Human-readable text.
    pub message: String,
    /// Whether the recipient has read it.
    pub read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Check if the notification has been read.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Whether the recipient caused the notification themselves.
    pub fn is_self_notification(&self) -> bool {
        self.recipient_id == self.actor_id
    }
}
