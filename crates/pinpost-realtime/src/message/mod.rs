//! Wire message types and JSON serialization.

pub mod serializer;
pub mod types;

pub use types::{InboundMessage, OutboundEvent};
