//! Handle to a single user's live delivery channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{mpsc, Notify, RwLock};
use tokio::time::Instant;

use pinpost_core::types::id::{ConnectionId, UserId};

use crate::message::types::OutboundEvent;

/// Why a push through a channel did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum DeliveryError {
    /// The channel was already closed or its receiver dropped.
    #[error("channel closed")]
    Closed,
    /// The outbound buffer stayed full for the whole push timeout.
    #[error("push timed out")]
    TimedOut,
}

/// A handle to one live connection.
///
/// Holds the bounded sender feeding the connection's write loop plus the
/// liveness state shared with the heartbeat. Once marked dead a handle
/// never comes back; a reconnect creates a new one.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub user_id: UserId,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last frame received from the peer
    last_activity: RwLock<Instant>,
    sender: mpsc::Sender<OutboundEvent>,
    push_timeout: Duration,
    alive: AtomicBool,
    closed: Notify,
}

impl ConnectionHandle {
    /// Create a handle and the receiving half its write loop drains.
    pub fn new(
        user_id: UserId,
        buffer: usize,
        push_timeout: Duration,
    ) -> (Arc<Self>, mpsc::Receiver<OutboundEvent>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let handle = Arc::new(Self {
            id: ConnectionId::new(),
            user_id,
            connected_at: Utc::now(),
            last_activity: RwLock::new(Instant::now()),
            sender,
            push_timeout,
            alive: AtomicBool::new(true),
            closed: Notify::new(),
        });
        (handle, receiver)
    }

    /// Push an event, waiting at most the push timeout for buffer space.
    ///
    /// Any failure marks the handle dead.
    pub(crate) async fn push(&self, event: OutboundEvent) -> Result<(), DeliveryError> {
        if !self.is_alive() {
            return Err(DeliveryError::Closed);
        }
        match self.sender.send_timeout(event, self.push_timeout).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => {
                tracing::warn!(
                    connection_id = %self.id,
                    user_id = %self.user_id,
                    "Send buffer stayed full, closing connection"
                );
                self.mark_dead();
                Err(DeliveryError::TimedOut)
            }
            Err(SendTimeoutError::Closed(_)) => {
                self.mark_dead();
                Err(DeliveryError::Closed)
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead and wake the session waiting on [`Self::closed`].
    pub fn mark_dead(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            self.closed.notify_one();
        }
    }

    /// Resolves once the handle has been marked dead.
    pub async fn closed(&self) {
        if !self.is_alive() {
            return;
        }
        self.closed.notified().await;
    }

    /// Update last activity timestamp
    pub async fn touch(&self) {
        *self.last_activity.write().await = Instant::now();
    }

    /// Last frame received from the peer.
    pub async fn last_activity(&self) -> Instant {
        *self.last_activity.read().await
    }
}
