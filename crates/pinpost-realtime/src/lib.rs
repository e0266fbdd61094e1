//! # pinpost-realtime
//!
//! Real-time delivery core for Pinpost. Provides:
//!
//! - Presence registry: one live delivery channel per user, online/last-seen state
//! - Fan-out dispatcher: best-effort push with disconnect-on-failure
//! - Typing signal routing between conversation participants
//! - Conversation delivery tracking: unread counters, delivered/read receipts
//! - Notification emission: persist first, then push
//! - Connection session loop with heartbeat and guaranteed cleanup

pub mod connection;
pub mod dispatch;
pub mod message;
pub mod messaging;
pub mod metrics;
pub mod notification;
pub mod presence;
pub mod server;
pub mod typing;

pub use connection::handle::ConnectionHandle;
pub use dispatch::Dispatcher;
pub use message::types::{InboundMessage, OutboundEvent};
pub use connection::{run_session, IncomingFrame, OutgoingFrame};
pub use messaging::DeliveryTracker;
pub use metrics::{MetricsSnapshot, RealtimeMetrics};
pub use notification::{NotificationDraft, NotificationEmitter, NotificationFormatter};
pub use presence::PresenceRegistry;
pub use server::RealtimeEngine;
pub use typing::{TypingBoard, TypingRouter};
