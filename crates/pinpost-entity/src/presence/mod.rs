//! Presence value objects.

pub mod model;

pub use model::{PresenceStatus, UserPresence};
