//! Shared test helpers for integration tests.

use std::sync::Arc;

use tokio::sync::mpsc;

use pinpost_core::config::realtime::RealtimeConfig;
use pinpost_core::types::id::UserId;
use pinpost_database::{MemoryStore, Stores};
use pinpost_entity::follow::Follow;
use pinpost_entity::user::UserProfile;
use pinpost_realtime::{ConnectionHandle, OutboundEvent, RealtimeEngine};

/// Test application context
pub struct TestApp {
    /// The engine under test
    pub engine: RealtimeEngine,
    /// Backing store for direct reads and seeding
    pub store: Arc<MemoryStore>,
}

/// A connected client
pub struct TestClient {
    /// Live channel handle
    pub handle: Arc<ConnectionHandle>,
    /// Events pushed to the client
    pub events: mpsc::Receiver<OutboundEvent>,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let engine = RealtimeEngine::new(RealtimeConfig::default(), Stores::from_memory(store.clone()));
        Self { engine, store }
    }

    /// Seed a user profile
    pub fn user(&self, username: &str) -> UserProfile {
        let profile = UserProfile::new(UserId::new(), username);
        self.store.insert_user(profile.clone());
        profile
    }

    /// Make two users follow each other
    pub fn befriend(&self, a: UserId, b: UserId) {
        self.store.insert_follow(Follow::new(a, b));
        self.store.insert_follow(Follow::new(b, a));
    }

    /// Connect a client for `user_id`
    pub async fn connect(&self, user_id: UserId) -> TestClient {
        let (handle, events) = self.engine.connect(user_id).await;
        TestClient { handle, events }
    }
}

impl TestClient {
    /// Drain every pending event
    pub fn drain(&mut self) -> Vec<OutboundEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Drain pending events, dropping presence updates
    pub fn drain_non_presence(&mut self) -> Vec<OutboundEvent> {
        self.drain()
            .into_iter()
            .filter(|event| !matches!(event, OutboundEvent::UserStatus { .. }))
            .collect()
    }
}
