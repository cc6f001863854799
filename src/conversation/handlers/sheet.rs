//! Sheet lifecycle: create, connect, disconnect, list
//!
//! Every handler talks to storage before touching the session, so a
//! storage failure leaves the chat exactly where it was and the user can
//! simply resend the same input.

use std::fmt::Write;
use uuid::Uuid;

use crate::conversation::registry::HandlerRecord;
use crate::conversation::reply::Reply;
use crate::conversation::session::{ChatSession, ChatStage};
use crate::core::messages;
use crate::core::validation::{parse_sheet_id, validate_new_sheet_name, validate_new_sheet_password};
use crate::storage::{BudgetStorage, SheetSummary};

pub(super) fn records() -> Vec<HandlerRecord> {
    vec![
        HandlerRecord::command("/createSheet", true, create_sheet),
        HandlerRecord::stage(ChatStage::CreateSheetInputName, true, input_new_sheet_name),
        HandlerRecord::stage(ChatStage::CreateSheetInputPassword, true, input_new_sheet_password),
        HandlerRecord::command("/connectSheet", true, connect_sheet),
        HandlerRecord::stage(ChatStage::ConnectToSheetInputID, true, input_sheet_id),
        HandlerRecord::stage(ChatStage::ConnectToSheetInputPassword, true, input_sheet_password),
        HandlerRecord::command("/disconnectSheet", true, disconnect_sheet),
        HandlerRecord::command("/listSheets", true, list_sheets),
    ]
}

fn create_sheet(_storage: &dyn BudgetStorage, _text: &str, session: &mut ChatSession) -> Reply {
    session.set_stage(ChatStage::CreateSheetInputName);
    Reply::text(messages::INPUT_NEW_SHEET_NAME)
}

fn input_new_sheet_name(_storage: &dyn BudgetStorage, name: &str, session: &mut ChatSession) -> Reply {
    if let Err(e) = validate_new_sheet_name(name) {
        return Reply::text(e.to_string());
    }

    session.await_new_sheet_password(name.to_string());
    Reply::text(messages::INPUT_NEW_SHEET_PASSWORD)
}

fn input_new_sheet_password(storage: &dyn BudgetStorage, password: &str, session: &mut ChatSession) -> Reply {
    if let Err(e) = validate_new_sheet_password(password) {
        return Reply::text(e.to_string());
    }

    let Some(name) = session.pending_new_sheet_name().map(str::to_string) else {
        log::warn!("Chat {} reached the sheet password step without a name", session.chat_id);
        session.set_stage(ChatStage::CreateSheetInputName);
        return Reply::text(messages::INPUT_NEW_SHEET_NAME);
    };

    let sheet_id = Uuid::new_v4();
    if let Err(e) = storage.insert_sheet(session.chat_id, sheet_id, &name, password) {
        log::error!("Failed to create sheet for chat {}: {}", session.chat_id, e);
        return Reply::server_error();
    }

    log::info!("Chat {} created sheet {} ({})", session.chat_id, sheet_id, name);
    session.connected_sheet = Some(sheet_id);
    session.set_stage(ChatStage::None);

    Reply::text(messages::created_new_sheet(&name, &sheet_id.to_string()))
}

fn connect_sheet(_storage: &dyn BudgetStorage, _text: &str, session: &mut ChatSession) -> Reply {
    session.set_stage(ChatStage::ConnectToSheetInputID);
    Reply::text(messages::INPUT_SHEET_ID)
}

fn input_sheet_id(_storage: &dyn BudgetStorage, text: &str, session: &mut ChatSession) -> Reply {
    match parse_sheet_id(text) {
        Ok(sheet_id) => {
            session.await_connect_password(sheet_id);
            Reply::text(messages::INPUT_SHEET_PASSWORD)
        }
        Err(e) => Reply::text(e.to_string()),
    }
}

fn input_sheet_password(storage: &dyn BudgetStorage, password: &str, session: &mut ChatSession) -> Reply {
    let Some(sheet_id) = session.pending_connect_sheet() else {
        log::warn!("Chat {} reached the connect password step without a sheet ID", session.chat_id);
        session.set_stage(ChatStage::ConnectToSheetInputID);
        return Reply::text(messages::INPUT_SHEET_ID);
    };

    if !storage.check_password(sheet_id, password) {
        session.set_stage(ChatStage::None);
        return Reply::text(messages::INCORRECT_PASSWORD);
    }

    if let Err(e) = storage.connect_chat_to_sheet(session.chat_id, sheet_id) {
        log::error!("Failed to connect chat {} to sheet {}: {}", session.chat_id, sheet_id, e);
        return Reply::server_error();
    }

    match storage.get_sheet_owner(sheet_id) {
        Ok(Some(owner)) => log::info!("Chat {} connected to sheet {} owned by {}", session.chat_id, sheet_id, owner),
        Ok(None) => log::info!("Chat {} connected to sheet {}", session.chat_id, sheet_id),
        Err(e) => log::warn!("Could not look up owner of sheet {}: {}", sheet_id, e),
    }

    session.connected_sheet = Some(sheet_id);
    session.set_stage(ChatStage::None);
    Reply::text(messages::SUCCESS_CONNECT_TO_SHEET)
}

fn disconnect_sheet(storage: &dyn BudgetStorage, _text: &str, session: &mut ChatSession) -> Reply {
    if let Err(e) = storage.disconnect_chat(session.chat_id) {
        log::error!("Failed to disconnect chat {}: {}", session.chat_id, e);
        return Reply::server_error();
    }

    session.connected_sheet = None;
    session.set_stage(ChatStage::None);
    Reply::text(messages::SUCCESS_DISCONNECT_SHEET)
}

fn list_sheets(storage: &dyn BudgetStorage, _text: &str, session: &mut ChatSession) -> Reply {
    let sheets = match storage.list_sheets(session.chat_id) {
        Ok(sheets) => sheets,
        Err(e) => {
            log::error!("Failed to list sheets of chat {}: {}", session.chat_id, e);
            return Reply::server_error();
        }
    };

    session.set_stage(ChatStage::None);
    if sheets.is_empty() {
        return Reply::text(messages::NO_SHEETS_OWNED);
    }

    Reply::text(format_sheet_list(&sheets))
}

fn format_sheet_list(sheets: &[SheetSummary]) -> String {
    let mut reply = messages::list_sheets_intro(sheets.len());
    reply.push_str("\n\n");
    for (i, sheet) in sheets.iter().enumerate() {
        let _ = write!(reply, "{:2}. Name: {}\n    ID: {}\n\n", i + 1, sheet.name, sheet.id);
    }
    reply.push_str(messages::LIST_SHEETS_OUTRO);
    reply
}
