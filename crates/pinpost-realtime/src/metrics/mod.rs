//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Total connections established
    pub connections_opened: AtomicU64,
    /// Total connections released
    pub connections_closed: AtomicU64,
    /// Events accepted by a live channel
    pub events_pushed: AtomicU64,
    /// Pushes that failed and triggered a disconnect
    pub push_failures: AtomicU64,
    /// Notifications persisted by the emitter
    pub notifications_emitted: AtomicU64,
    /// Chat messages persisted by the tracker
    pub messages_sent: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection
    pub fn record_connect(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a released connection
    pub fn record_disconnect(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful push
    pub fn record_push(&self) {
        self.events_pushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed push
    pub fn record_push_failure(&self) {
        self.push_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an emitted notification
    pub fn record_notification(&self) {
        self.notifications_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a sent chat message
    pub fn record_message(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        MetricsSnapshot {
            connections_opened: opened,
            connections_closed: closed,
            connections_active: opened.saturating_sub(closed),
            events_pushed: self.events_pushed.load(Ordering::Relaxed),
            push_failures: self.push_failures.load(Ordering::Relaxed),
            notifications_emitted: self.notifications_emitted.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever established
    pub connections_opened: u64,
    /// Total connections released
    pub connections_closed: u64,
    /// Opened minus closed
    pub connections_active: u64,
    /// Events accepted by a live channel
    pub events_pushed: u64,
    /// Failed pushes
    pub push_failures: u64,
    /// Notifications emitted
    pub notifications_emitted: u64,
    /// Chat messages sent
    pub messages_sent: u64,
}
