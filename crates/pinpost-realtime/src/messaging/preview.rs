//! Conversation list preview text.

use pinpost_entity::message::{MessageContent, MessageKind};

/// Preview label for image messages.
pub const IMAGE_PREVIEW: &str = "📷 Photo";
/// Preview label for voice messages.
pub const VOICE_PREVIEW: &str = "🎤 Voice message";

/// Preview of a message for the conversation list.
///
/// Text is cut to `max_chars` characters; media messages get a fixed label
/// and never expose the payload.
pub fn preview_text(content: &MessageContent, max_chars: usize) -> String {
    match content.kind {
        MessageKind::Text => content.text.chars().take(max_chars).collect(),
        MessageKind::Image => IMAGE_PREVIEW.to_string(),
        MessageKind::Voice => VOICE_PREVIEW.to_string(),
    }
}
