//! Database pool, migrations, and the budget storage collaborator

pub mod budget;
pub mod db;
pub mod migrations;
pub mod password;

// Re-exports for convenience
pub use budget::{BudgetStorage, NewPayment, SheetSummary, SqliteStorage};
pub use db::{create_in_memory_pool, create_pool, get_connection, DbConnection, DbPool};
