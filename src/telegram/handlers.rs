//! Dispatcher schema: feeds text messages into the router and sends its
//! replies back

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, Message, ReplyMarkup};

use crate::conversation::{Reply, Router};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub router: Arc<Router>,
}

impl HandlerDeps {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }
}

/// Creates the dispatcher schema for the bot.
///
/// The same schema runs in production and in `MockBot` tests. Messages
/// without text are ignored.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry().branch(text_message_handler(deps))
}

fn text_message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let text = msg.text().unwrap_or_default();
                log::info!("[{}] {}", sender_name(&msg), text);

                let reply = deps.router.handle(msg.chat.id.0, text).await;
                if let Err(e) = bot
                    .send_message(msg.chat.id, reply.text.as_str())
                    .reply_markup(reply_markup(&reply))
                    .await
                {
                    log::error!("Failed to send reply to chat {}: {}", msg.chat.id, e);
                }
                Ok(())
            }
        })
}

/// Username when present, otherwise the full name, otherwise the chat id
fn sender_name(msg: &Message) -> String {
    match msg.from.as_ref() {
        Some(user) => user.username.clone().unwrap_or_else(|| user.full_name()),
        None => msg.chat.id.to_string(),
    }
}

/// One button per row; no options removes whatever keyboard was shown
fn reply_markup(reply: &Reply) -> ReplyMarkup {
    if reply.options.is_empty() {
        return ReplyMarkup::KeyboardRemove(KeyboardRemove::new());
    }

    let rows: Vec<Vec<KeyboardButton>> = reply
        .options
        .iter()
        .map(|option| vec![KeyboardButton::new(option.as_str())])
        .collect();
    ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard().one_time_keyboard())
}
