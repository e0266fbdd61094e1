//! Dispatcher: pushes events to users who are currently reachable.
//!
//! Delivery is at most once and only to a user connected at push time.
//! Offline recipients are skipped silently; the caller has already
//! persisted whatever the event describes. A failed push disconnects the
//! broken channel, and the resulting offline broadcast may itself fail on
//! other channels. Those follow-up disconnects are drained from a worklist
//! rather than by recursion.
//!
//! Every offline transition, whichever path causes it, also drops the
//! user's typing flags.

use std::sync::Arc;

use futures::future::join_all;

use pinpost_core::types::id::UserId;

use crate::connection::handle::ConnectionHandle;
use crate::message::types::OutboundEvent;
use crate::metrics::RealtimeMetrics;
use crate::presence::registry::PresenceRegistry;
use crate::typing::board::TypingBoard;

/// Routes events through the presence registry.
#[derive(Debug)]
pub struct Dispatcher {
    /// Presence registry
    registry: Arc<PresenceRegistry>,
    /// Typing flags, cleared when their owner goes offline
    typing: Arc<TypingBoard>,
    /// Metrics
    metrics: Arc<RealtimeMetrics>,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(registry: Arc<PresenceRegistry>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            registry,
            typing: Arc::new(TypingBoard::new()),
            metrics,
        }
    }

    /// Presence registry this dispatcher reads.
    pub fn registry(&self) -> &Arc<PresenceRegistry> {
        &self.registry
    }

    /// Typing flags owned by this dispatcher.
    pub fn typing_board(&self) -> &Arc<TypingBoard> {
        &self.typing
    }

    /// Check if a user is reachable
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.registry.is_online(user_id)
    }

    /// Register a live channel and announce the user as online to everyone,
    /// the user included.
    pub async fn connect(&self, handle: Arc<ConnectionHandle>) {
        tracing::info!(
            user_id = %handle.user_id,
            connection_id = %handle.id,
            "User connected"
        );
        self.metrics.record_connect();
        let (event, replaced) = self.registry.connect(handle);
        if replaced.is_some() {
            self.metrics.record_disconnect();
        }
        self.broadcast(event, None).await;
    }

    /// Mark a user offline and announce it to everyone else.
    pub async fn disconnect(&self, user_id: UserId) {
        let had_channel = self.registry.handle(user_id);
        let event = self.registry.disconnect(user_id);
        if had_channel.is_some() {
            self.metrics.record_disconnect();
        }
        self.typing.clear_user(user_id);
        tracing::info!(user_id = %user_id, "User disconnected");
        self.broadcast(event, Some(user_id)).await;
    }

    /// Disconnect the handle's user if `handle` is still their live channel.
    ///
    /// Returns `false` when a newer connection has replaced it.
    pub async fn release(&self, handle: &ConnectionHandle) -> bool {
        match self.registry.release(handle) {
            Some(event) => {
                self.metrics.record_disconnect();
                self.typing.clear_user(handle.user_id);
                tracing::info!(
                    user_id = %handle.user_id,
                    connection_id = %handle.id,
                    "User disconnected"
                );
                self.broadcast(event, Some(handle.user_id)).await;
                true
            }
            None => {
                tracing::debug!(
                    user_id = %handle.user_id,
                    connection_id = %handle.id,
                    "Stale connection released"
                );
                false
            }
        }
    }

    /// Push an event to one user.
    ///
    /// Returns `true` if the live channel accepted it. Offline users are a
    /// no-op; a failed push disconnects the user.
    pub async fn push(&self, user_id: UserId, event: OutboundEvent) -> bool {
        let Some(handle) = self.registry.handle(user_id) else {
            tracing::trace!(user_id = %user_id, kind = event.kind(), "Recipient offline, skipping push");
            return false;
        };

        if self.deliver(&handle, event).await {
            return true;
        }
        self.drop_broken(vec![handle]).await;
        false
    }

    /// Push an event to every online user except `exclude`.
    ///
    /// The recipient set is snapshotted before any push.
    pub async fn broadcast(&self, event: OutboundEvent, exclude: Option<UserId>) {
        let failed = self.fan_out(&event, exclude).await;
        self.drop_broken(failed).await;
    }

    /// Push to a snapshot of live handles concurrently and return the ones
    /// that failed.
    async fn fan_out(
        &self,
        event: &OutboundEvent,
        exclude: Option<UserId>,
    ) -> Vec<Arc<ConnectionHandle>> {
        let recipients: Vec<Arc<ConnectionHandle>> = self
            .registry
            .online_handles()
            .into_iter()
            .filter(|handle| Some(handle.user_id) != exclude)
            .collect();

        let results = join_all(recipients.iter().map(|handle| async move {
            self.deliver(handle, event.clone()).await
        }))
        .await;

        recipients
            .into_iter()
            .zip(results)
            .filter_map(|(handle, delivered)| (!delivered).then_some(handle))
            .collect()
    }

    async fn deliver(&self, handle: &ConnectionHandle, event: OutboundEvent) -> bool {
        let kind = event.kind();
        match handle.push(event).await {
            Ok(()) => {
                self.metrics.record_push();
                true
            }
            Err(e) => {
                self.metrics.record_push_failure();
                tracing::warn!(
                    user_id = %handle.user_id,
                    connection_id = %handle.id,
                    kind,
                    error = %e,
                    "Push failed, disconnecting"
                );
                false
            }
        }
    }

    /// Release every broken handle, broadcasting each user's offline event
    /// and queueing any handle that fails during those broadcasts.
    ///
    /// Terminates because each release removes a handle from the registry
    /// and only registered handles are pushed to.
    async fn drop_broken(&self, mut broken: Vec<Arc<ConnectionHandle>>) {
        while let Some(handle) = broken.pop() {
            let Some(event) = self.registry.release(&handle) else {
                continue;
            };
            self.metrics.record_disconnect();
            self.typing.clear_user(handle.user_id);
            let failed = self.fan_out(&event, Some(handle.user_id)).await;
            broken.extend(failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pinpost_core::types::id::ConversationId;
    use tokio::sync::mpsc;

    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            Arc::new(PresenceRegistry::new()),
            Arc::new(RealtimeMetrics::new()),
        )
    }

    fn channel(user_id: UserId) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundEvent>) {
        ConnectionHandle::new(user_id, 16, Duration::from_millis(20))
    }

    fn drain(rx: &mut mpsc::Receiver<OutboundEvent>) -> Vec<OutboundEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn statuses(events: &[OutboundEvent]) -> Vec<(UserId, bool)> {
        events
            .iter()
            .filter_map(|event| match event {
                OutboundEvent::UserStatus {
                    user_id, online, ..
                } => Some((*user_id, *online)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_push_to_offline_user_is_noop() {
        let dispatcher = dispatcher();
        assert!(!dispatcher.push(UserId::new(), OutboundEvent::Pong).await);
        assert_eq!(dispatcher.metrics.snapshot().push_failures, 0);
    }

    #[tokio::test]
    async fn test_connect_broadcasts_to_everyone_including_self() {
        let dispatcher = dispatcher();
        let a = UserId::new();
        let b = UserId::new();
        let (ha, mut rx_a) = channel(a);
        let (hb, mut rx_b) = channel(b);

        dispatcher.connect(ha).await;
        dispatcher.connect(hb).await;

        assert_eq!(statuses(&drain(&mut rx_a)), vec![(a, true), (b, true)]);
        assert_eq!(statuses(&drain(&mut rx_b)), vec![(b, true)]);
    }

    #[tokio::test]
    async fn test_double_connect_keeps_one_channel_and_broadcasts_twice() {
        let dispatcher = dispatcher();
        let observer = UserId::new();
        let user = UserId::new();
        let (ho, mut rx_o) = channel(observer);
        dispatcher.connect(ho).await;
        drain(&mut rx_o);

        let (h1, _rx1) = channel(user);
        let (h2, _rx2) = channel(user);
        dispatcher.connect(h1).await;
        dispatcher.connect(h2.clone()).await;

        assert_eq!(
            dispatcher.registry().handle(user).map(|h| h.id),
            Some(h2.id)
        );
        assert_eq!(statuses(&drain(&mut rx_o)), vec![(user, true), (user, true)]);
    }

    #[tokio::test]
    async fn test_disconnect_broadcasts_offline_to_others() {
        let dispatcher = dispatcher();
        let a = UserId::new();
        let b = UserId::new();
        let (ha, mut rx_a) = channel(a);
        let (hb, _rx_b) = channel(b);
        dispatcher.connect(ha).await;
        dispatcher.connect(hb).await;
        drain(&mut rx_a);

        dispatcher.disconnect(b).await;

        assert!(!dispatcher.is_online(b));
        assert_eq!(
            dispatcher.registry().status(b).map(|s| s.online),
            Some(false)
        );
        assert_eq!(statuses(&drain(&mut rx_a)), vec![(b, false)]);
    }

    #[tokio::test]
    async fn test_failed_push_disconnects_user() {
        let dispatcher = dispatcher();
        let a = UserId::new();
        let b = UserId::new();
        let (ha, mut rx_a) = channel(a);
        let (hb, rx_b) = channel(b);
        dispatcher.connect(ha).await;
        dispatcher.connect(hb).await;
        drain(&mut rx_a);
        drop(rx_b);

        assert!(!dispatcher.push(b, OutboundEvent::Pong).await);
        assert!(!dispatcher.is_online(b));
        assert_eq!(statuses(&drain(&mut rx_a)), vec![(b, false)]);
        assert_eq!(dispatcher.metrics.snapshot().push_failures, 1);
    }

    #[tokio::test]
    async fn test_failed_push_clears_typing_flags() {
        let dispatcher = dispatcher();
        let user = UserId::new();
        let conversation = ConversationId::new();
        let (handle, rx) = channel(user);
        dispatcher.connect(handle.clone()).await;
        dispatcher.typing_board().set(conversation, user, true);
        drop(rx);

        assert!(!dispatcher.push(user, OutboundEvent::Pong).await);
        assert!(!dispatcher.release(&handle).await, "already released by the failed push");
        assert!(!dispatcher.typing_board().is_typing(conversation, user));
    }

    #[tokio::test]
    async fn test_reconnect_does_not_inflate_active_connections() {
        let dispatcher = dispatcher();
        let user = UserId::new();
        let (first, _rx_first) = channel(user);
        let (second, _rx_second) = channel(user);
        dispatcher.connect(first.clone()).await;
        dispatcher.connect(second).await;
        assert_eq!(dispatcher.metrics.snapshot().connections_active, 1);

        assert!(!dispatcher.release(&first).await);
        dispatcher.disconnect(user).await;

        let snapshot = dispatcher.metrics.snapshot();
        assert_eq!(snapshot.connections_opened, 2);
        assert_eq!(snapshot.connections_closed, 2);
        assert_eq!(snapshot.connections_active, 0);
    }

    #[tokio::test]
    async fn test_broadcast_failures_cascade_without_recursion() {
        let dispatcher = dispatcher();
        let survivor = UserId::new();
        let (hs, mut rx_s) = channel(survivor);
        dispatcher.connect(hs).await;

        let mut dead = Vec::new();
        for _ in 0..3 {
            let user = UserId::new();
            let (handle, rx) = channel(user);
            dispatcher.connect(handle).await;
            dead.push((user, rx));
        }
        drain(&mut rx_s);
        let dead_users: Vec<UserId> = dead.iter().map(|(user, _)| *user).collect();
        drop(dead);

        dispatcher.broadcast(OutboundEvent::Pong, None).await;

        assert_eq!(dispatcher.registry().online_count(), 1);
        let offline: Vec<UserId> = statuses(&drain(&mut rx_s))
            .into_iter()
            .filter(|(_, online)| !online)
            .map(|(user, _)| user)
            .collect();
        for user in dead_users {
            assert!(offline.contains(&user));
        }
    }

    #[tokio::test]
    async fn test_release_of_replaced_handle_keeps_user_online() {
        let dispatcher = dispatcher();
        let user = UserId::new();
        let (old, _rx_old) = channel(user);
        let (new, _rx_new) = channel(user);
        dispatcher.connect(old.clone()).await;
        dispatcher.connect(new).await;

        assert!(!dispatcher.release(&old).await);
        assert!(dispatcher.is_online(user));
    }
}
