//! Budgetbot - Telegram bot for shared budget sheets
//!
//! Users create a password-protected sheet, add spending categories, and
//! log payments by sending lines like `42 groceries`.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, reply texts, validators
//! - `storage`: SQLite pool, migrations, and the storage collaborator
//! - `conversation`: Per-chat sessions, handler registry, and router
//! - `telegram`: Bot construction and the dispatcher schema

pub mod cli;
pub mod conversation;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use conversation::{Registry, Reply, Router};
pub use core::{config, AppError, AppResult};
pub use storage::{create_pool, BudgetStorage, DbPool, SqliteStorage};
pub use telegram::{schema, HandlerDeps};
