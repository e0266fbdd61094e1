//! End-to-end scenarios for the real-time engine against the in-memory store.

mod helpers;
mod messaging_test;
mod notification_test;
mod presence_test;
