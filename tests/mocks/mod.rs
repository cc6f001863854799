//! Mock implementations for integration tests
//!
//! The router only depends on the `BudgetStorage` trait, so scenarios run
//! against an in-memory recorder instead of SQLite.

pub mod mock_storage;

pub use mock_storage::MockStorage;
