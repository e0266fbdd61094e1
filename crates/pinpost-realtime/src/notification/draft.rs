//! Builder for notification records.

use chrono::Utc;

use pinpost_core::types::id::{CommentId, NotificationId, UserId};
use pinpost_entity::notification::{NotificationKind, NotificationRecord, SubjectRef};

/// A notification that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    /// The user who will receive it
    pub recipient_id: UserId,
    /// What happened
    pub kind: NotificationKind,
    /// Who caused it
    pub actor_id: UserId,
    /// Actor display name
    pub actor_display: String,
    /// Human-readable text
    pub message: String,
    /// Post or blog concerned
    pub subject: Option<SubjectRef>,
    /// Comment concerned
    pub comment_id: Option<CommentId>,
}

impl NotificationDraft {
    /// Start a draft with the required fields.
    pub fn new(
        recipient_id: UserId,
        kind: NotificationKind,
        actor_id: UserId,
        actor_display: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient_id,
            kind,
            actor_id,
            actor_display: actor_display.into(),
            message: message.into(),
            subject: None,
            comment_id: None,
        }
    }

    /// Attach the post or blog the notification is about.
    pub fn subject(mut self, subject: SubjectRef) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Attach the related comment.
    pub fn comment(mut self, comment_id: CommentId) -> Self {
        self.comment_id = Some(comment_id);
        self
    }

    /// Turn the draft into an unread record stamped now.
    pub fn into_record(self) -> NotificationRecord {
        NotificationRecord {
            id: NotificationId::new(),
            recipient_id: self.recipient_id,
            kind: self.kind,
            actor_id: self.actor_id,
            actor_display: self.actor_display,
            subject: self.subject,
            related_comment_id: self.comment_id,
            message: self.message,
            read: false,
            created_at: Utc::now(),
        }
    }
}
