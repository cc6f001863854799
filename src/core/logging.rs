//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Configuration summary logged once at startup

use anyhow::Result;
use secrecy::ExposeSecret;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file (appended to, created if missing)
/// * `level` - Level applied to both outputs
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to open the log file or a logger is already set
pub fn init_logger(log_file_path: &str, level: LevelFilter) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_file_path, e))?;

    CombinedLogger::init(vec![
        TermLogger::new(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Human-readable configuration summary, token redacted
pub fn configuration_summary() -> Vec<String> {
    let token_state = if config::BOT_TOKEN.expose_secret().is_empty() {
        "not set"
    } else {
        "set (redacted)"
    };

    vec![
        format!("BOT_TOKEN: {}", token_state),
        format!(
            "BOT_API_URL: {}",
            config::BOT_API_URL.as_deref().unwrap_or("default (api.telegram.org)")
        ),
        format!("DATABASE_PATH: {}", config::DATABASE_PATH.as_str()),
        format!("LOG_FILE_PATH: {}", config::LOG_FILE_PATH.as_str()),
        format!("LOG_LEVEL: {}", *config::LOG_LEVEL),
    ]
}

/// Logs the resolved configuration at application startup
pub fn log_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for line in configuration_summary() {
        log::info!("  {}", line);
    }
    if config::BOT_TOKEN.expose_secret().is_empty() {
        log::error!("BOT_TOKEN is empty - the bot cannot connect to Telegram");
    }
}
