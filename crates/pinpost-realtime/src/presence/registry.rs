//! Presence registry: user ID → presence record plus the live channel handle.
//!
//! Each user's entry lives in one `DashMap` shard, so connect, disconnect and
//! release for the same user are serialized by the shard lock. Transitions
//! return the `user_status` event to broadcast; the dispatcher sends it.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use pinpost_core::types::id::UserId;
use pinpost_entity::presence::{PresenceStatus, UserPresence};

use crate::connection::handle::ConnectionHandle;
use crate::message::types::OutboundEvent;

#[derive(Debug)]
struct PresenceEntry {
    presence: UserPresence,
    handle: Option<Arc<ConnectionHandle>>,
}

/// Tracks presence state and the delivery handle for every user seen
/// during this process lifetime.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    entries: DashMap<UserId, PresenceEntry>,
}

impl PresenceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` as the user's live channel.
    ///
    /// A previous handle is replaced but not closed; it is returned alongside
    /// the event so the caller can account for it.
    pub fn connect(
        &self,
        handle: Arc<ConnectionHandle>,
    ) -> (OutboundEvent, Option<Arc<ConnectionHandle>>) {
        let user_id = handle.user_id;
        let now = Utc::now();
        let replaced = self
            .entries
            .insert(
                user_id,
                PresenceEntry {
                    presence: UserPresence::connected(user_id, now),
                    handle: Some(handle),
                },
            )
            .and_then(|previous| previous.handle);

        if let Some(previous) = &replaced {
            tracing::debug!(
                user_id = %user_id,
                connection_id = %previous.id,
                "Replaced existing connection"
            );
        }

        (OutboundEvent::user_status(user_id, true, now), replaced)
    }

    /// Drop the user's live channel and mark them offline.
    ///
    /// Idempotent: a second call only refreshes `last_seen`. Users with no
    /// record are left untouched.
    pub fn disconnect(&self, user_id: UserId) -> OutboundEvent {
        let now = Utc::now();
        if let Some(mut entry) = self.entries.get_mut(&user_id) {
            entry.handle = None;
            entry.presence.online = false;
            entry.presence.last_seen = now;
        }
        OutboundEvent::user_status(user_id, false, now)
    }

    /// Disconnect the handle's user only if `handle` is still their current
    /// channel. Returns `None` when a newer connection has taken over.
    pub fn release(&self, handle: &ConnectionHandle) -> Option<OutboundEvent> {
        let mut entry = self.entries.get_mut(&handle.user_id)?;
        let is_current = entry
            .handle
            .as_ref()
            .is_some_and(|current| current.id == handle.id);
        if !is_current {
            return None;
        }

        let now = Utc::now();
        entry.handle = None;
        entry.presence.online = false;
        entry.presence.last_seen = now;
        Some(OutboundEvent::user_status(handle.user_id, false, now))
    }

    /// Check if a user has a live channel
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.entries
            .get(&user_id)
            .is_some_and(|entry| entry.handle.is_some())
    }

    /// In-memory status, or `None` if the user never connected.
    pub fn status(&self, user_id: UserId) -> Option<PresenceStatus> {
        self.entries.get(&user_id).map(|entry| entry.presence.status())
    }

    /// Full presence record, or `None` if the user never connected.
    pub fn presence(&self, user_id: UserId) -> Option<UserPresence> {
        self.entries.get(&user_id).map(|entry| entry.presence.clone())
    }

    /// The user's current handle.
    pub fn handle(&self, user_id: UserId) -> Option<Arc<ConnectionHandle>> {
        self.entries
            .get(&user_id)
            .and_then(|entry| entry.handle.clone())
    }

    /// Snapshot of every live handle.
    pub fn online_handles(&self) -> Vec<Arc<ConnectionHandle>> {
        self.entries
            .iter()
            .filter_map(|entry| entry.handle.clone())
            .collect()
    }

    /// Get online user count
    pub fn online_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.handle.is_some())
            .count()
    }

    /// Take every live handle out of the registry and mark its user offline.
    pub fn drain(&self) -> Vec<Arc<ConnectionHandle>> {
        let now = Utc::now();
        let mut drained = Vec::new();
        for mut entry in self.entries.iter_mut() {
            if let Some(handle) = entry.handle.take() {
                entry.presence.online = false;
                entry.presence.last_seen = now;
                drained.push(handle);
            }
        }
        drained
    }
}
