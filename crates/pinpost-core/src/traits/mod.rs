//! Core traits defined in `pinpost-core` and implemented by other crates.

pub mod identity;

pub use identity::IdentityResolver;
