//! Core type definitions used across the Pinpost workspace.

pub mod id;

pub use id::*;
