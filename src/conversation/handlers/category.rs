//! Categories of the connected sheet

use uuid::Uuid;

use crate::conversation::registry::HandlerRecord;
use crate::conversation::reply::Reply;
use crate::conversation::session::{ChatSession, ChatStage};
use crate::core::messages;
use crate::storage::BudgetStorage;

pub(super) fn records() -> Vec<HandlerRecord> {
    vec![
        HandlerRecord::command("/createCategory", false, create_category),
        HandlerRecord::stage(ChatStage::CreateCategoryInputName, false, input_category_name),
        HandlerRecord::command("/listCategories", false, list_categories),
    ]
}

fn create_category(_storage: &dyn BudgetStorage, _text: &str, session: &mut ChatSession) -> Reply {
    session.set_stage(ChatStage::CreateCategoryInputName);
    Reply::text(messages::INPUT_CATEGORY_NAME)
}

fn input_category_name(storage: &dyn BudgetStorage, name: &str, session: &mut ChatSession) -> Reply {
    // The router gate guarantees a connected sheet here
    let Some(sheet_id) = session.connected_sheet else {
        session.set_stage(ChatStage::None);
        return Reply::not_connected();
    };

    let category_id = Uuid::new_v4();
    if let Err(e) = storage.insert_category(sheet_id, category_id, name) {
        log::error!("Failed to create category in sheet {}: {}", sheet_id, e);
        return Reply::server_error();
    }

    log::info!("Chat {} created category {:?} in sheet {}", session.chat_id, name, sheet_id);
    session.set_stage(ChatStage::None);
    Reply::text(messages::SUCCESS_CREATE_CATEGORY)
}

fn list_categories(storage: &dyn BudgetStorage, _text: &str, session: &mut ChatSession) -> Reply {
    let Some(sheet_id) = session.connected_sheet else {
        return Reply::not_connected();
    };

    match storage.list_categories(sheet_id) {
        Ok(names) if names.is_empty() => Reply::text(messages::NO_CATEGORIES),
        Ok(names) => Reply::text(format_category_list(&names)),
        Err(e) => {
            log::error!("Failed to list categories of sheet {}: {}", sheet_id, e);
            Reply::server_error()
        }
    }
}

fn format_category_list(names: &[String]) -> String {
    let mut reply = messages::list_categories_intro(names.len());
    reply.push_str("\n\n");
    for name in names {
        reply.push_str(" - ");
        reply.push_str(name);
        reply.push('\n');
    }
    reply.push('\n');
    reply.push_str(messages::LIST_CATEGORIES_OUTRO);
    reply
}
