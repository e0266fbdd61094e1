//! Chat message records.

pub mod kind;
pub mod model;

pub use kind::MessageKind;
pub use model::{Message, MessageContent};
