//! Ephemeral typing indicators.

pub mod board;
pub mod router;

pub use board::TypingBoard;
pub use router::TypingRouter;
