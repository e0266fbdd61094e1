//! Fan-out of events to live channels.

pub mod dispatcher;

pub use dispatcher::Dispatcher;
