//! Message dispatch: one inbound text in, one reply out

use std::sync::Arc;

use crate::conversation::registry::Registry;
use crate::conversation::reply::Reply;
use crate::conversation::session::{ChatSession, SessionStore};
use crate::storage::BudgetStorage;

/// Routes chat messages to handlers.
///
/// Messages of one chat are handled strictly one at a time (the session
/// lock is held for the whole handler run); different chats never wait on
/// each other.
pub struct Router {
    registry: Registry,
    sessions: SessionStore,
    storage: Arc<dyn BudgetStorage>,
}

impl Router {
    pub fn new(registry: Registry, storage: Arc<dyn BudgetStorage>) -> Self {
        Self {
            registry,
            sessions: SessionStore::new(),
            storage,
        }
    }

    /// Handles one message from `chat_id` and returns the reply to send.
    pub async fn handle(&self, chat_id: i64, text: &str) -> Reply {
        let shared = match self.sessions.get_or_create(chat_id, self.storage.as_ref()).await {
            Ok(session) => session,
            Err(e) => {
                log::error!("Failed to load session for chat {}: {}", chat_id, e);
                return Reply::server_error();
            }
        };

        let mut session = shared.lock().await;
        self.dispatch(text, &mut session)
    }

    /// Resolves and runs the handler for `text` against an already locked
    /// session.
    ///
    /// Handlers receive `text` as typed; only the command lookup sees the
    /// normalized form.
    pub(crate) fn dispatch(&self, text: &str, session: &mut ChatSession) -> Reply {
        let record = self.registry.resolve(text, session.stage());
        log::debug!(
            "Chat {} in stage {} resolved to {:?}",
            session.chat_id,
            session.stage(),
            record.trigger
        );

        if !record.sheet_optional && session.connected_sheet.is_none() {
            return Reply::not_connected();
        }

        (record.run)(self.storage.as_ref(), text, session)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
