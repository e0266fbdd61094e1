//! Conversation records.

pub mod model;
pub mod pair;

pub use model::{Conversation, ParticipantDetail};
pub use pair::ParticipantPair;
