//! User records.

pub mod model;

pub use model::UserProfile;
