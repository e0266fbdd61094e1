//! # pinpost-entity
//!
//! Record models for Pinpost. Every struct in this crate is either a
//! persisted document (user, follow, conversation, message, notification)
//! or an in-memory value object (presence). All of them derive `Debug`,
//! `Clone`, `Serialize` and `Deserialize`.

pub mod conversation;
pub mod follow;
pub mod message;
pub mod notification;
pub mod presence;
pub mod user;
