//! Unified error handling for the persistence crates.
//!
//! Database failures are carried through untouched so callers can inspect
//! the original `DbErr` (constraint violations, connection loss, ...).

use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    // Configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl AppError {
    /// Get a stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Borrow the underlying database error, if this is one.
    #[cfg(feature = "database")]
    pub fn as_db_err(&self) -> Option<&sea_orm::DbErr> {
        match self {
            AppError::Database(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}
