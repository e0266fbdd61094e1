//! Integration tests for notification emission.

use pinpost_core::types::id::PostId;
use pinpost_database::NotificationStore;
use pinpost_entity::notification::SubjectRef;
use pinpost_realtime::{NotificationFormatter, OutboundEvent};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_like_reaches_online_author_once() {
    let app = TestApp::new();
    let alice = app.user("alice");
    let bob = app.user("bob");
    let mut bob_client = app.connect(bob.id).await;
    bob_client.drain();

    let draft = NotificationFormatter::liked(&alice, bob.id, SubjectRef::post(PostId::new()));
    let record = app.engine.notifications.emit(draft).await.expect("emit");

    assert!(!record.read);
    assert_eq!(record.message, "alice liked your post");
    let stored = app.store.find_for_recipient(bob.id).await.expect("stored");
    assert_eq!(stored, vec![record.clone()]);

    let events = bob_client.drain();
    assert_eq!(events.len(), 1);
    match &events[0] {
        OutboundEvent::Notification { notification } => assert_eq!(notification.id, record.id),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_like_for_offline_author_is_only_persisted() {
    let app = TestApp::new();
    let alice = app.user("alice");
    let bob = app.user("bob");

    let draft = NotificationFormatter::liked(&alice, bob.id, SubjectRef::blog(PostId::new()));
    app.engine.notifications.emit(draft).await.expect("emit");

    assert_eq!(app.store.find_for_recipient(bob.id).await.expect("stored").len(), 1);
    assert_eq!(app.engine.metrics.snapshot().events_pushed, 0);
}

#[tokio::test]
async fn test_self_like_notifies_actor() {
    let app = TestApp::new();
    let alice = app.user("alice");
    let mut client = app.connect(alice.id).await;
    client.drain();

    let draft = NotificationFormatter::liked(&alice, alice.id, SubjectRef::post(PostId::new()));
    let record = app.engine.notifications.emit(draft).await.expect("emit");

    assert!(record.is_self_notification());
    assert_eq!(app.store.find_for_recipient(alice.id).await.expect("stored").len(), 1);
    assert!(matches!(
        client.drain().as_slice(),
        [OutboundEvent::Notification { .. }]
    ));
}
