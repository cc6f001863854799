use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
/// Empty when neither is set; startup refuses to run the bot in that case
pub static BOT_TOKEN: Lazy<SecretString> = Lazy::new(|| {
    let token = env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default();
    SecretString::from(token)
});

/// Custom Bot API server URL
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: budget.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "budget.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: budgetbot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "budgetbot.log".to_string()));

/// Log level for both console and file output
/// Read from LOG_LEVEL environment variable (error, warn, info, debug, trace)
/// Unknown values fall back to info
pub static LOG_LEVEL: Lazy<log::LevelFilter> = Lazy::new(|| {
    env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(log::LevelFilter::Info)
});

/// Database configuration
pub mod database {
    use super::Duration;

    /// Maximum number of pooled SQLite connections
    pub const MAX_POOL_SIZE: u32 = 8;

    /// How long a connection waits on a locked database (in seconds)
    pub const BUSY_TIMEOUT_SECS: u64 = 5;

    /// Busy timeout duration
    pub fn busy_timeout() -> Duration {
        Duration::from_secs(BUSY_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Must stay above the long polling timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Limits for user-supplied sheet credentials
pub mod validation {
    /// Minimum sheet name length (in bytes)
    pub const MIN_SHEET_NAME_LEN: usize = 3;

    /// Minimum sheet password length (in bytes)
    pub const MIN_SHEET_PASSWORD_LEN: usize = 3;
}
