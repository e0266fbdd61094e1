//! Integration tests for presence and typing.

use pinpost_realtime::OutboundEvent;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_never_connected_user_reports_persisted_status() {
    let app = TestApp::new();
    let alice = app.user("alice");

    let status = app.engine.user_status(alice.id).await.expect("status");
    assert!(!status.online);
    assert_eq!(status.last_seen, alice.last_seen);
}

#[tokio::test]
async fn test_double_connect_keeps_one_channel() {
    let app = TestApp::new();
    let watcher = app.user("watcher");
    let alice = app.user("alice");
    let mut watcher_client = app.connect(watcher.id).await;
    watcher_client.drain();

    let first = app.connect(alice.id).await;
    let second = app.connect(alice.id).await;

    assert!(app.engine.is_online(alice.id));
    assert_eq!(
        app.engine.registry.handle(alice.id).map(|h| h.id),
        Some(second.handle.id)
    );
    assert_ne!(first.handle.id, second.handle.id);

    let online_broadcasts = watcher_client
        .drain()
        .into_iter()
        .filter(|event| {
            matches!(event, OutboundEvent::UserStatus { user_id, online: true, .. } if *user_id == alice.id)
        })
        .count();
    assert_eq!(online_broadcasts, 2);
}

#[tokio::test]
async fn test_disconnect_broadcasts_offline() {
    let app = TestApp::new();
    let watcher = app.user("watcher");
    let alice = app.user("alice");
    let mut watcher_client = app.connect(watcher.id).await;
    let _alice_client = app.connect(alice.id).await;
    watcher_client.drain();

    app.engine.disconnect(alice.id).await;

    let status = app.engine.user_status(alice.id).await.expect("status");
    assert!(!status.online);
    assert!(matches!(
        watcher_client.drain().as_slice(),
        [OutboundEvent::UserStatus { online: false, .. }]
    ));
}

#[tokio::test]
async fn test_typing_reaches_other_participant_only() {
    let app = TestApp::new();
    let alice = app.user("alice");
    let bob = app.user("bob");
    app.befriend(alice.id, bob.id);
    let conversation = app
        .engine
        .tracker
        .get_or_create_conversation(alice.id, bob.id)
        .await
        .expect("conversation");
    let mut alice_client = app.connect(alice.id).await;
    let mut bob_client = app.connect(bob.id).await;

    app.engine
        .typing
        .set_typing(alice.id, conversation.id, true)
        .await
        .expect("typing");

    assert!(matches!(
        bob_client.drain_non_presence().as_slice(),
        [OutboundEvent::Typing { typing: true, .. }]
    ));
    assert!(alice_client.drain_non_presence().is_empty());
}
