//! Conversations, messages, and their delivery state.

pub mod preview;
pub mod tracker;

pub use tracker::DeliveryTracker;
