//! Notification records.

pub mod kind;
pub mod model;

pub use kind::{NotificationKind, SubjectKind};
pub use model::{NotificationRecord, SubjectRef};
