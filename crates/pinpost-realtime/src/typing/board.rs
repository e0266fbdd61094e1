//! Who is typing where.
//!
//! Shared between the typing router, which writes flags, and the
//! dispatcher, which drops a user's flags whenever that user goes offline.

use dashmap::DashMap;

use pinpost_core::types::id::{ConversationId, UserId};

/// Typing flags keyed by `(conversation, typist)`. An absent key means
/// "not typing".
#[derive(Debug, Default)]
pub struct TypingBoard {
    flags: DashMap<(ConversationId, UserId), bool>,
}

impl TypingBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a flag. `false` removes the key.
    pub fn set(&self, conversation_id: ConversationId, user_id: UserId, typing: bool) {
        if typing {
            self.flags.insert((conversation_id, user_id), true);
        } else {
            self.flags.remove(&(conversation_id, user_id));
        }
    }

    /// Check if a user is typing in a conversation
    pub fn is_typing(&self, conversation_id: ConversationId, user_id: UserId) -> bool {
        self.flags
            .get(&(conversation_id, user_id))
            .is_some_and(|typing| *typing)
    }

    /// Forget every flag held by `user_id`.
    pub fn clear_user(&self, user_id: UserId) {
        self.flags.retain(|(_, typist), _| *typist != user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_user_keeps_other_typists() {
        let board = TypingBoard::new();
        let conversation = ConversationId::new();
        let other_conversation = ConversationId::new();
        let a = UserId::new();
        let b = UserId::new();
        board.set(conversation, a, true);
        board.set(other_conversation, a, true);
        board.set(conversation, b, true);

        board.clear_user(a);

        assert!(!board.is_typing(conversation, a));
        assert!(!board.is_typing(other_conversation, a));
        assert!(board.is_typing(conversation, b));
    }

    #[test]
    fn test_false_removes_flag() {
        let board = TypingBoard::new();
        let conversation = ConversationId::new();
        let user = UserId::new();
        board.set(conversation, user, true);
        board.set(conversation, user, false);
        assert!(!board.is_typing(conversation, user));
    }
}
