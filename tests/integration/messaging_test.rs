//! Integration tests for conversations, delivery, and read receipts.

use pinpost_core::error::ErrorKind;
use pinpost_entity::message::MessageContent;
use pinpost_realtime::OutboundEvent;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_offline_send_then_read() {
    let app = TestApp::new();
    let alice = app.user("alice");
    let bob = app.user("bob");
    app.befriend(alice.id, bob.id);
    let tracker = &app.engine.tracker;

    let conversation = tracker
        .get_or_create_conversation(alice.id, bob.id)
        .await
        .expect("conversation");
    let message = tracker
        .send_message(conversation.id, alice.id, MessageContent::text("hi"))
        .await
        .expect("send");

    assert!(message.delivered_to.is_empty());
    assert_eq!(message.read_by.len(), 1);
    assert!(message.is_read_by(alice.id));
    assert_eq!(tracker.unread_total(bob.id).await.expect("unread"), 1);

    // Connecting does not replay history.
    let mut bob_client = app.connect(bob.id).await;
    assert!(bob_client.drain_non_presence().is_empty());

    tracker
        .mark_conversation_read(conversation.id, bob.id)
        .await
        .expect("mark read");

    let stored = tracker
        .messages_in(conversation.id, bob.id)
        .await
        .expect("messages");
    assert!(stored[0].is_read_by(alice.id));
    assert!(stored[0].is_read_by(bob.id));
    assert_eq!(tracker.unread_total(bob.id).await.expect("unread"), 0);
}

#[tokio::test]
async fn test_online_exchange_pushes_message_and_receipt() {
    let app = TestApp::new();
    let alice = app.user("alice");
    let bob = app.user("bob");
    app.befriend(alice.id, bob.id);
    let mut alice_client = app.connect(alice.id).await;
    let mut bob_client = app.connect(bob.id).await;
    let tracker = &app.engine.tracker;

    let conversation = tracker
        .get_or_create_conversation(bob.id, alice.id)
        .await
        .expect("conversation");
    let message = tracker
        .send_message(conversation.id, alice.id, MessageContent::image("https://cdn.example/a.jpg", ""))
        .await
        .expect("send");
    assert!(message.delivered_to.contains(&bob.id));

    let pushed = bob_client.drain_non_presence();
    assert_eq!(pushed.len(), 1);
    assert!(matches!(&pushed[0], OutboundEvent::NewMessage { message: m } if m.id == message.id));
    assert!(alice_client.drain_non_presence().is_empty(), "sender gets no copy");

    assert!(tracker.mark_message_read(message.id, bob.id).await.expect("read"));

    let receipts = alice_client.drain_non_presence();
    assert_eq!(receipts.len(), 1);
    match &receipts[0] {
        OutboundEvent::MessageStatus {
            message_id,
            delivered_to,
            read_by,
            ..
        } => {
            assert_eq!(*message_id, message.id);
            assert!(delivered_to.contains(&bob.id));
            assert!(read_by.contains(&bob.id));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_conversation_requires_mutual_follow() {
    let app = TestApp::new();
    let alice = app.user("alice");
    let bob = app.user("bob");
    app.store
        .insert_follow(pinpost_entity::follow::Follow::new(alice.id, bob.id));

    let err = app
        .engine
        .tracker
        .get_or_create_conversation(alice.id, bob.id)
        .await
        .expect_err("one-sided");
    assert!(err.is(ErrorKind::Eligibility));
}

#[tokio::test]
async fn test_concurrent_creation_yields_one_conversation() {
    let app = TestApp::new();
    let alice = app.user("alice");
    let bob = app.user("bob");
    app.befriend(alice.id, bob.id);

    let tracker = app.engine.tracker.clone();
    let other = app.engine.tracker.clone();
    let (left, right) = tokio::join!(
        tokio::spawn(async move { tracker.get_or_create_conversation(alice.id, bob.id).await }),
        tokio::spawn(async move { other.get_or_create_conversation(bob.id, alice.id).await }),
    );

    let left = left.expect("task").expect("left");
    let right = right.expect("task").expect("right");
    assert_eq!(left.id, right.id);
    assert_eq!(
        app.engine
            .tracker
            .conversations_for(alice.id)
            .await
            .expect("list")
            .len(),
        1
    );
}
