//! Presence tracking: who is reachable and since when.

pub mod registry;

pub use registry::PresenceRegistry;
