//! Live delivery channels: the per-user handle, heartbeat, and session loop.

pub mod handle;
pub mod heartbeat;
pub mod session;

pub use handle::ConnectionHandle;
pub use session::{IncomingFrame, OutgoingFrame, run_session};
