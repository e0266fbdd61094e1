//! Follow relationship records.

pub mod model;

pub use model::Follow;
