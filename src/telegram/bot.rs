//! Bot construction and the Telegram command menu

use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::core::error::AppResult;

/// Commands shown in the Telegram menu
///
/// Telegram only accepts lowercase menu entries; the router matches
/// commands case-insensitively, so `/createsheet` and `/createSheet` reach
/// the same handler.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "greeting and quick start")]
    Start,
    #[command(description = "full command reference")]
    Help,
    #[command(description = "create a new password-protected sheet")]
    CreateSheet,
    #[command(description = "connect to an existing sheet")]
    ConnectSheet,
    #[command(description = "disconnect from the current sheet")]
    DisconnectSheet,
    #[command(description = "list the sheets you own")]
    ListSheets,
    #[command(description = "add a category to the current sheet")]
    CreateCategory,
    #[command(description = "list categories of the current sheet")]
    ListCategories,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Empty token, invalid URL, or HTTP client failure
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.expose_secret();
    if token.is_empty() {
        anyhow::bail!("BOT_TOKEN (or TELOXIDE_TOKEN) is not set");
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(token, client);

    let bot = match config::BOT_API_URL.as_deref() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Registers the command menu in the Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> AppResult<()> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
