//! /start and /help

use crate::conversation::registry::HandlerRecord;
use crate::conversation::reply::Reply;
use crate::conversation::session::{ChatSession, ChatStage};
use crate::core::messages;
use crate::storage::BudgetStorage;

pub(super) fn records() -> Vec<HandlerRecord> {
    vec![
        HandlerRecord::command("/start", true, start),
        HandlerRecord::command("/help", true, help),
    ]
}

fn start(_storage: &dyn BudgetStorage, _text: &str, session: &mut ChatSession) -> Reply {
    session.set_stage(ChatStage::None);

    if session.connected_sheet.is_some() {
        return Reply::text(format!("{}\n\n{}", messages::START_GREETING, messages::START_FULL_HELP));
    }

    Reply::text(format!(
        "{}\n\n{}\n\n{}",
        messages::START_GREETING,
        messages::START_CONNECT,
        messages::START_FULL_HELP
    ))
    .with_options(&["/createSheet", "/connectSheet"])
}

fn help(_storage: &dyn BudgetStorage, _text: &str, session: &mut ChatSession) -> Reply {
    session.set_stage(ChatStage::None);
    Reply::text(messages::HELP)
}
