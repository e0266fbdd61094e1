//! Store traits for each collection the real-time core touches.
//!
//! Each trait mirrors the narrow set of document-store operations the core
//! needs: get-by-id, insert, field updates, and predicate queries. Set and
//! counter updates are single operations so that implementations can apply
//! them atomically.

pub mod conversation;
pub mod follow;
pub mod message;
pub mod notification;
pub mod user;

pub use conversation::ConversationStore;
pub use follow::FollowStore;
pub use message::MessageStore;
pub use notification::NotificationStore;
pub use user::UserStore;
