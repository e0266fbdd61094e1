//! Convenience result type alias for Pinpost.

use crate::error::AppError;

/// A specialized `Result` type for Pinpost operations.
pub type AppResult<T> = Result<T, AppError>;
