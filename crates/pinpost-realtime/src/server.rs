//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use pinpost_core::config::realtime::RealtimeConfig;
use pinpost_core::types::id::UserId;
use pinpost_core::{AppError, AppResult};
use pinpost_database::Stores;
use pinpost_entity::presence::PresenceStatus;

use crate::connection::handle::ConnectionHandle;
use crate::dispatch::Dispatcher;
use crate::message::types::OutboundEvent;
use crate::messaging::DeliveryTracker;
use crate::metrics::RealtimeMetrics;
use crate::notification::NotificationEmitter;
use crate::presence::PresenceRegistry;
use crate::typing::TypingRouter;

/// Central real-time engine. Built once at startup and shared by cloning.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Presence registry.
    pub registry: Arc<PresenceRegistry>,
    /// Fan-out dispatcher.
    pub dispatcher: Arc<Dispatcher>,
    /// Typing signal router.
    pub typing: Arc<TypingRouter>,
    /// Conversation and receipt tracker.
    pub tracker: Arc<DeliveryTracker>,
    /// Notification emitter.
    pub notifications: Arc<NotificationEmitter>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    stores: Stores,
    config: Arc<RealtimeConfig>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("online", &self.registry.online_count())
            .finish_non_exhaustive()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig, stores: Stores) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let registry = Arc::new(PresenceRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(registry.clone(), metrics.clone()));
        let typing = Arc::new(TypingRouter::new(
            stores.conversations.clone(),
            dispatcher.clone(),
        ));
        let tracker = Arc::new(DeliveryTracker::new(
            stores.clone(),
            dispatcher.clone(),
            metrics.clone(),
            config.preview_max_chars,
        ));
        let notifications = Arc::new(NotificationEmitter::new(
            stores.notifications.clone(),
            dispatcher.clone(),
            metrics.clone(),
        ));

        info!("Real-time engine initialized");

        Self {
            registry,
            dispatcher,
            typing,
            tracker,
            notifications,
            metrics,
            stores,
            config: Arc::new(config),
        }
    }

    /// Realtime settings the engine was built with.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Open a live channel for `user_id`, replacing any previous one.
    ///
    /// Returns the handle and the receiver the connection's write loop
    /// drains.
    pub async fn connect(
        &self,
        user_id: UserId,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundEvent>) {
        let (handle, receiver) = ConnectionHandle::new(
            user_id,
            self.config.channel_buffer_size,
            self.config.push_timeout(),
        );
        self.dispatcher.connect(handle.clone()).await;
        (handle, receiver)
    }

    /// Force a user offline.
    pub async fn disconnect(&self, user_id: UserId) {
        if let Some(handle) = self.registry.handle(user_id) {
            handle.mark_dead();
        }
        self.dispatcher.disconnect(user_id).await;
    }

    /// Tear down a connection that ended. Only disconnects the user if
    /// `handle` is still their current channel.
    pub async fn release(&self, handle: &ConnectionHandle) -> bool {
        handle.mark_dead();
        self.dispatcher.release(handle).await
    }

    /// Check if a user is online
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.registry.is_online(user_id)
    }

    /// Presence of a user: the in-memory record if they connected during
    /// this process, otherwise offline with the persisted last-seen time.
    pub async fn user_status(&self, user_id: UserId) -> AppResult<PresenceStatus> {
        if let Some(status) = self.registry.status(user_id) {
            return Ok(status);
        }
        let user = self
            .stores
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        Ok(PresenceStatus {
            online: false,
            last_seen: user.last_seen,
        })
    }

    /// Close every live channel. Sessions notice and exit on their own.
    pub async fn shutdown(&self) -> AppResult<()> {
        info!("Shutting down real-time engine");

        let handles = self.registry.drain();
        let typing = self.dispatcher.typing_board();
        for handle in &handles {
            handle.mark_dead();
            typing.clear_user(handle.user_id);
            self.metrics.record_disconnect();
        }

        info!(closed = handles.len(), "Real-time engine shut down");
        Ok(())
    }
}
