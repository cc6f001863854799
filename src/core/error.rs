use thiserror::Error;

use crate::conversation::registry::RegistryError;

/// Centralized error types for the application
///
/// Storage, transport and startup failures all convert into this enum.
/// None of these messages are shown to chat users: the router replaces
/// any error with the generic server-error reply.
///
/// # Example
///
/// ```no_run
/// use budgetbot::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Handler registry misconfiguration (fatal at startup)
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Storage could not answer for a reason other than "no row"
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
