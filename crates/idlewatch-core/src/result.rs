//! Convenience result type alias for IdleWatch.

use crate::error::AppError;

/// A specialized `Result` type for IdleWatch operations.
pub type AppResult<T> = Result<T, AppError>;
