//! # pinpost-core
//!
//! Core crate for Pinpost. Contains configuration schemas, typed
//! identifiers, the identity-resolution seam, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Pinpost crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
