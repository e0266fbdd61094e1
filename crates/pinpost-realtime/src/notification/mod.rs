//! Notification drafting, formatting, and emission.

pub mod draft;
pub mod emitter;
pub mod formatter;

pub use draft::NotificationDraft;
pub use emitter::NotificationEmitter;
pub use formatter::NotificationFormatter;
