//! # pinpost-database
//!
//! Record store seams consumed by the real-time core, plus in-memory
//! implementations backed by `dashmap`.
//!
//! The document store itself is external; anything that can answer the
//! traits in [`store`] can be plugged into [`Stores`].

pub mod memory;
pub mod store;

use std::sync::Arc;

pub use memory::MemoryStore;
pub use store::{ConversationStore, FollowStore, MessageStore, NotificationStore, UserStore};

/// The set of collections the real-time core reads and writes.
#[derive(Debug, Clone)]
pub struct Stores {
    /// User profiles.
    pub users: Arc<dyn UserStore>,
    /// Follow edges.
    pub follows: Arc<dyn FollowStore>,
    /// Conversations.
    pub conversations: Arc<dyn ConversationStore>,
    /// Messages.
    pub messages: Arc<dyn MessageStore>,
    /// Notifications.
    pub notifications: Arc<dyn NotificationStore>,
}

impl Stores {
    /// Use one in-memory store for every collection.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            follows: store.clone(),
            conversations: store.clone(),
            messages: store.clone(),
            notifications: store,
        }
    }
}
