//! Typing signal router.

use std::sync::Arc;

use pinpost_core::types::id::{ConversationId, UserId};
use pinpost_core::AppResult;
use pinpost_database::ConversationStore;

use crate::dispatch::Dispatcher;
use crate::message::types::OutboundEvent;
use crate::typing::board::TypingBoard;

/// Records typing changes on the dispatcher's [`TypingBoard`] and relays
/// them to the other participant. State is never persisted.
#[derive(Debug)]
pub struct TypingRouter {
    board: Arc<TypingBoard>,
    conversations: Arc<dyn ConversationStore>,
    dispatcher: Arc<Dispatcher>,
}

impl TypingRouter {
    /// Create a new typing router
    pub fn new(conversations: Arc<dyn ConversationStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            board: dispatcher.typing_board().clone(),
            conversations,
            dispatcher,
        }
    }

    /// Record a typing change and push it to the conversation's other
    /// participants.
    ///
    /// Unknown conversations and non-participants are ignored.
    pub async fn set_typing(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
        typing: bool,
    ) -> AppResult<()> {
        let Some(conversation) = self.conversations.find_by_id(conversation_id).await? else {
            tracing::debug!(
                user_id = %user_id,
                conversation_id = %conversation_id,
                "Typing signal for unknown conversation ignored"
            );
            return Ok(());
        };
        if !conversation.is_participant(user_id) {
            tracing::debug!(
                user_id = %user_id,
                conversation_id = %conversation_id,
                "Typing signal from non-participant ignored"
            );
            return Ok(());
        }

        self.board.set(conversation_id, user_id, typing);

        for recipient in conversation.recipients_of(user_id) {
            self.dispatcher
                .push(
                    recipient,
                    OutboundEvent::Typing {
                        conversation_id,
                        user_id,
                        typing,
                    },
                )
                .await;
        }
        Ok(())
    }

    /// Check if a user is typing in a conversation
    pub fn is_typing(&self, conversation_id: ConversationId, user_id: UserId) -> bool {
        self.board.is_typing(conversation_id, user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pinpost_database::MemoryStore;
    use pinpost_entity::conversation::{Conversation, ParticipantPair};

    use super::*;
    use crate::connection::handle::ConnectionHandle;
    use crate::metrics::RealtimeMetrics;
    use crate::presence::PresenceRegistry;

    async fn setup() -> (TypingRouter, Arc<Dispatcher>, Conversation) {
        let store = Arc::new(MemoryStore::new());
        let pair = ParticipantPair::new(UserId::new(), UserId::new()).expect("distinct users");
        let conversation = store
            .insert_if_absent(Conversation::new(pair, Vec::new()))
            .await
            .expect("insert");
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(PresenceRegistry::new()),
            Arc::new(RealtimeMetrics::new()),
        ));
        (
            TypingRouter::new(store, dispatcher.clone()),
            dispatcher,
            conversation,
        )
    }

    #[tokio::test]
    async fn test_typing_is_pushed_to_other_participant() {
        let (router, dispatcher, conversation) = setup().await;
        let typist = conversation.participants.first();
        let other = conversation.participants.second();
        let (handle, mut rx) = ConnectionHandle::new(other, 8, Duration::from_millis(20));
        dispatcher.connect(handle).await;
        let _ = rx.recv().await;

        router
            .set_typing(typist, conversation.id, true)
            .await
            .expect("set typing");

        assert!(router.is_typing(conversation.id, typist));
        match rx.recv().await {
            Some(OutboundEvent::Typing {
                conversation_id,
                user_id,
                typing,
            }) => {
                assert_eq!(conversation_id, conversation.id);
                assert_eq!(user_id, typist);
                assert!(typing);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stop_typing_clears_state() {
        let (router, _dispatcher, conversation) = setup().await;
        let typist = conversation.participants.first();
        router.set_typing(typist, conversation.id, true).await.expect("start");
        router.set_typing(typist, conversation.id, false).await.expect("stop");
        assert!(!router.is_typing(conversation.id, typist));
    }

    #[tokio::test]
    async fn test_dispatcher_disconnect_clears_flags() {
        let (router, dispatcher, conversation) = setup().await;
        let typist = conversation.participants.first();
        let (handle, _rx) = ConnectionHandle::new(typist, 8, Duration::from_millis(20));
        dispatcher.connect(handle).await;
        router.set_typing(typist, conversation.id, true).await.expect("start");

        dispatcher.disconnect(typist).await;

        assert!(!router.is_typing(conversation.id, typist));
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_noop() {
        let (router, _dispatcher, _conversation) = setup().await;
        let user = UserId::new();
        let missing = ConversationId::new();
        router.set_typing(user, missing, true).await.expect("no-op");
        assert!(!router.is_typing(missing, user));
    }

    #[tokio::test]
    async fn test_non_participant_is_ignored() {
        let (router, _dispatcher, conversation) = setup().await;
        let outsider = UserId::new();
        router
            .set_typing(outsider, conversation.id, true)
            .await
            .expect("no-op");
        assert!(!router.is_typing(conversation.id, outsider));
    }
}
