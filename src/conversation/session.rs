//! Per-chat conversation state and the store that owns it

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use uuid::Uuid;

use crate::core::error::{AppError, AppResult};
use crate::storage::BudgetStorage;

/// What input the chat is expected to send next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum ChatStage {
    /// No pending multi-step operation
    #[default]
    None,
    CreateSheetInputName,
    CreateSheetInputPassword,
    ConnectToSheetInputID,
    ConnectToSheetInputPassword,
    CreateCategoryInputName,
}

/// Conversation state of one chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub chat_id: i64,
    stage: ChatStage,
    pub connected_sheet: Option<Uuid>,
    /// Set while in `CreateSheetInputPassword`
    pending_new_sheet_name: Option<String>,
    /// Set while in `ConnectToSheetInputPassword`
    pending_connect_sheet: Option<Uuid>,
}

impl ChatSession {
    /// Fresh session with no pending operation
    pub fn new(chat_id: i64, connected_sheet: Option<Uuid>) -> Self {
        Self {
            chat_id,
            stage: ChatStage::None,
            connected_sheet,
            pending_new_sheet_name: None,
            pending_connect_sheet: None,
        }
    }

    pub fn stage(&self) -> ChatStage {
        self.stage
    }

    /// Moves to `stage`, dropping scratch data that does not belong to it.
    pub fn set_stage(&mut self, stage: ChatStage) {
        self.stage = stage;
        if stage != ChatStage::CreateSheetInputPassword {
            self.pending_new_sheet_name = None;
        }
        if stage != ChatStage::ConnectToSheetInputPassword {
            self.pending_connect_sheet = None;
        }
    }

    /// Enters `CreateSheetInputPassword` remembering the chosen name.
    pub fn await_new_sheet_password(&mut self, name: String) {
        self.set_stage(ChatStage::CreateSheetInputPassword);
        self.pending_new_sheet_name = Some(name);
    }

    /// Enters `ConnectToSheetInputPassword` remembering the candidate sheet.
    pub fn await_connect_password(&mut self, sheet_id: Uuid) {
        self.set_stage(ChatStage::ConnectToSheetInputPassword);
        self.pending_connect_sheet = Some(sheet_id);
    }

    pub fn pending_new_sheet_name(&self) -> Option<&str> {
        self.pending_new_sheet_name.as_deref()
    }

    pub fn pending_connect_sheet(&self) -> Option<Uuid> {
        self.pending_connect_sheet
    }
}

/// Handle to one chat's session; holding the lock serializes that chat
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Owns one [`ChatSession`] per chat for the life of the process.
///
/// Lookups for different chats proceed independently; the first lookup of
/// a chat hydrates it from storage exactly once even under concurrency.
#[derive(Default)]
pub struct SessionStore {
    /// Map shard locks are only held to fetch or insert a slot, never
    /// across storage calls.
    sessions: DashMap<i64, Arc<OnceCell<SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chat's session, creating it from the persisted current
    /// sheet on first use.
    ///
    /// Concurrent first messages for the same chat wait on the chat's slot
    /// and all receive the session the winner hydrated. A failed hydration
    /// leaves the slot empty; the next message tries again.
    pub async fn get_or_create(&self, chat_id: i64, storage: &dyn BudgetStorage) -> AppResult<SharedSession> {
        if let Some(existing) = self.get(chat_id) {
            return Ok(existing);
        }

        let slot = Arc::clone(self.sessions.entry(chat_id).or_default().value());
        let session = slot
            .get_or_try_init(|| async {
                let connected_sheet = storage
                    .fetch_connected_sheet(chat_id)
                    .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
                log::debug!("Hydrated session for chat {} (sheet: {:?})", chat_id, connected_sheet);
                Ok::<_, AppError>(Arc::new(Mutex::new(ChatSession::new(chat_id, connected_sheet))))
            })
            .await?;

        Ok(Arc::clone(session))
    }

    /// Cached session of `chat_id`, without hydrating
    pub fn get(&self, chat_id: i64) -> Option<SharedSession> {
        self.sessions.get(&chat_id).and_then(|slot| slot.value().get().cloned())
    }

    /// Number of chats with a live session
    pub fn len(&self) -> usize {
        self.sessions.iter().filter(|slot| slot.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
