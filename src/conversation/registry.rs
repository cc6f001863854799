//! Static table of chat handlers
//!
//! Each handler is a plain data record: what triggers it, whether it needs
//! a connected sheet, and the function that produces the reply. The table
//! is assembled once at startup and never changes afterwards.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::conversation::reply::Reply;
use crate::conversation::session::{ChatSession, ChatStage};
use crate::conversation::handlers;
use crate::storage::BudgetStorage;

/// Reply-producing step; may mutate the session and call storage
pub type HandlerFn = fn(&dyn BudgetStorage, &str, &mut ChatSession) -> Reply;

/// When a handler answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Exact command text, compared after trimming and lowercasing
    Command(&'static str),
    /// Any text while the session is in this stage
    Stage(ChatStage),
    /// Last resort when nothing else matches
    Fallback,
}

#[derive(Clone, Copy)]
pub struct HandlerRecord {
    pub trigger: Trigger,
    /// When `false` the router refuses to run the handler without a
    /// connected sheet
    pub sheet_optional: bool,
    pub run: HandlerFn,
}

impl HandlerRecord {
    pub const fn command(command: &'static str, sheet_optional: bool, run: HandlerFn) -> Self {
        Self {
            trigger: Trigger::Command(command),
            sheet_optional,
            run,
        }
    }

    pub const fn stage(stage: ChatStage, sheet_optional: bool, run: HandlerFn) -> Self {
        Self {
            trigger: Trigger::Stage(stage),
            sheet_optional,
            run,
        }
    }

    pub const fn fallback(sheet_optional: bool, run: HandlerFn) -> Self {
        Self {
            trigger: Trigger::Fallback,
            sheet_optional,
            run,
        }
    }
}

impl fmt::Debug for HandlerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRecord")
            .field("trigger", &self.trigger)
            .field("sheet_optional", &self.sheet_optional)
            .finish_non_exhaustive()
    }
}

/// Registry misconfiguration; fatal at startup
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no default handler registered")]
    MissingDefault,

    #[error("more than one default handler registered")]
    DuplicateDefault,

    #[error("command {0:?} registered twice")]
    DuplicateCommand(String),

    #[error("stage {0} registered twice")]
    DuplicateStage(ChatStage),

    #[error("command trigger is empty after normalization")]
    EmptyCommand,

    #[error("stage None cannot trigger a handler; use the fallback trigger")]
    IdleStageTrigger,
}

/// Trims surrounding whitespace and lowercases, the form commands are
/// matched in.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Handlers partitioned by trigger
pub struct Registry {
    by_command: HashMap<String, HandlerRecord>,
    by_stage: HashMap<ChatStage, HandlerRecord>,
    fallback: HandlerRecord,
}

impl Registry {
    /// Partitions `records` into command, stage and fallback lookups.
    ///
    /// Fails when no fallback exists or when two records claim the same
    /// key.
    pub fn build(records: impl IntoIterator<Item = HandlerRecord>) -> Result<Self, RegistryError> {
        let mut by_command = HashMap::new();
        let mut by_stage = HashMap::new();
        let mut fallback = None;

        for record in records {
            match record.trigger {
                Trigger::Command(command) => {
                    let key = normalize(command);
                    if key.is_empty() {
                        return Err(RegistryError::EmptyCommand);
                    }
                    if by_command.contains_key(&key) {
                        return Err(RegistryError::DuplicateCommand(key));
                    }
                    by_command.insert(key, record);
                }
                Trigger::Stage(ChatStage::None) => return Err(RegistryError::IdleStageTrigger),
                Trigger::Stage(stage) => {
                    if by_stage.insert(stage, record).is_some() {
                        return Err(RegistryError::DuplicateStage(stage));
                    }
                }
                Trigger::Fallback => {
                    if fallback.replace(record).is_some() {
                        return Err(RegistryError::DuplicateDefault);
                    }
                }
            }
        }

        let fallback = fallback.ok_or(RegistryError::MissingDefault)?;
        log::debug!(
            "Handler registry built: {} commands, {} stages",
            by_command.len(),
            by_stage.len()
        );

        Ok(Self {
            by_command,
            by_stage,
            fallback,
        })
    }

    /// The bot's full handler set: info, sheets, categories, payments.
    pub fn standard() -> Result<Self, RegistryError> {
        Self::build(handlers::all())
    }

    /// Picks the handler for `text` arriving while in `stage`.
    ///
    /// An exact command always wins over the current stage, which is how a
    /// user abandons a multi-step flow.
    pub fn resolve(&self, text: &str, stage: ChatStage) -> &HandlerRecord {
        self.by_command
            .get(&normalize(text))
            .or_else(|| self.by_stage.get(&stage))
            .unwrap_or(&self.fallback)
    }

    /// Registered commands in normalized form, sorted
    pub fn commands(&self) -> Vec<&str> {
        let mut commands: Vec<&str> = self.by_command.keys().map(String::as_str).collect();
        commands.sort_unstable();
        commands
    }
}
