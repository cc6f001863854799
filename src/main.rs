use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;

use budgetbot::cli::{Cli, Commands};
use budgetbot::conversation::{Registry, Router};
use budgetbot::core::logging::configuration_summary;
use budgetbot::core::{config, init_logger, log_configuration};
use budgetbot::storage::{create_pool, SqliteStorage};
use budgetbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the selected subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, registry, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before any config is read
    let _ = dotenv();

    match cli.command {
        Some(Commands::CheckConfig) => {
            for line in configuration_summary() {
                println!("{}", line);
            }
            Ok(())
        }
        Some(Commands::Migrate) => {
            init_logger(&config::LOG_FILE_PATH, *config::LOG_LEVEL)?;
            create_pool(&config::DATABASE_PATH)
                .with_context(|| format!("Failed to migrate database {}", config::DATABASE_PATH.as_str()))?;
            log::info!("Database {} is up to date", config::DATABASE_PATH.as_str());
            Ok(())
        }
        Some(Commands::Run) | None => {
            init_logger(&config::LOG_FILE_PATH, *config::LOG_LEVEL)?;
            run_bot().await
        }
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting budgetbot...");
    log_configuration();

    let registry = Registry::standard().context("Invalid handler registry")?;

    let pool = create_pool(&config::DATABASE_PATH)
        .with_context(|| format!("Failed to open database {}", config::DATABASE_PATH.as_str()))?;
    let storage = Arc::new(SqliteStorage::new(pool));
    let router = Arc::new(Router::new(registry, storage));

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let me = bot.get_me().await.context("Failed to reach Telegram")?;
    log::info!("Bot @{} is running", me.username());

    Dispatcher::builder(bot, schema(HandlerDeps::new(router)))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
