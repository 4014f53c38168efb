//! Convenience result type alias for CodeRelay.

use crate::error::AppError;

/// A specialized `Result` type for CodeRelay operations.
pub type AppResult<T> = Result<T, AppError>;
