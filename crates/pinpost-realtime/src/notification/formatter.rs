//! Notification message formatting.

use pinpost_core::types::id::{CommentId, UserId};
use pinpost_entity::notification::{NotificationKind, SubjectRef};
use pinpost_entity::user::UserProfile;

use super::draft::NotificationDraft;

/// Formats notifications for social events.
pub struct NotificationFormatter;

impl NotificationFormatter {
    /// `actor` liked the recipient's post or blog.
    pub fn liked(actor: &UserProfile, recipient_id: UserId, subject: SubjectRef) -> NotificationDraft {
        NotificationDraft::new(
            recipient_id,
            NotificationKind::Like,
            actor.id,
            &actor.username,
            format!("{} liked your {}", actor.username, subject.kind),
        )
        .subject(subject)
    }

    /// `actor` commented on the recipient's post or blog.
    pub fn commented(
        actor: &UserProfile,
        recipient_id: UserId,
        subject: SubjectRef,
        comment_id: CommentId,
    ) -> NotificationDraft {
        NotificationDraft::new(
            recipient_id,
            NotificationKind::Comment,
            actor.id,
            &actor.username,
            format!("{} commented on your {}", actor.username, subject.kind),
        )
        .subject(subject)
        .comment(comment_id)
    }

    /// `actor` replied to one of the recipient's comments.
    pub fn replied(
        actor: &UserProfile,
        recipient_id: UserId,
        subject: SubjectRef,
        comment_id: CommentId,
    ) -> NotificationDraft {
        NotificationDraft::new(
            recipient_id,
            NotificationKind::Reply,
            actor.id,
            &actor.username,
            format!("{} replied to your comment", actor.username),
        )
        .subject(subject)
        .comment(comment_id)
    }

    /// `actor` started following the recipient.
    pub fn followed(actor: &UserProfile, recipient_id: UserId) -> NotificationDraft {
        NotificationDraft::new(
            recipient_id,
            NotificationKind::Follow,
            actor.id,
            &actor.username,
            format!("{} started following you", actor.username),
        )
    }
}
