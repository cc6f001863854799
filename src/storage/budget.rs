//! Storage collaborator for the conversation router
//!
//! [`BudgetStorage`] is the seam between chat handlers and persistence:
//! handlers only ever see the trait, production wires in [`SqliteStorage`],
//! and tests substitute an in-memory recorder.
//!
//! "No row" is never an error here. Lookups that can legitimately miss
//! return `Ok(None)` (or an empty list); `Err` always means the database
//! itself could not answer.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::core::error::AppResult;
use crate::storage::db::{get_connection, DbConnection, DbPool};
use crate::storage::password::PasswordHash;

/// A sheet as listed to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub id: Uuid,
    pub name: String,
}

/// A payment about to be recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub sheet_id: Uuid,
    pub category_id: Uuid,
    pub payment_id: Uuid,
    /// Amount in integer minor units (cents); negative for refunds
    pub amount_minor: i64,
    pub comment: String,
    pub occurred_at: DateTime<Utc>,
}

/// Persistent sheet/category/payment records, keyed by chat.
///
/// Calls are synchronous from the router's point of view and are never
/// retried by it.
pub trait BudgetStorage: Send + Sync {
    /// Sheet the chat is currently connected to, if any.
    fn fetch_connected_sheet(&self, chat_id: i64) -> AppResult<Option<Uuid>>;

    /// Creates a sheet owned by `chat_id` and makes it the chat's current
    /// sheet. Both writes happen atomically.
    fn insert_sheet(&self, chat_id: i64, sheet_id: Uuid, name: &str, password: &str) -> AppResult<()>;

    /// Points the chat at `sheet_id`, replacing any previous association.
    fn connect_chat_to_sheet(&self, chat_id: i64, sheet_id: Uuid) -> AppResult<()>;

    /// Removes the chat's current-sheet association.
    fn disconnect_chat(&self, chat_id: i64) -> AppResult<()>;

    /// `true` only when the sheet exists and the password matches.
    fn check_password(&self, sheet_id: Uuid, password: &str) -> bool;

    fn insert_category(&self, sheet_id: Uuid, category_id: Uuid, name: &str) -> AppResult<()>;

    /// Exact, case-sensitive lookup of a category name within a sheet.
    fn find_category(&self, sheet_id: Uuid, name: &str) -> AppResult<Option<Uuid>>;

    /// Category names of a sheet in creation order.
    fn list_categories(&self, sheet_id: Uuid) -> AppResult<Vec<String>>;

    fn insert_payment(&self, payment: &NewPayment) -> AppResult<()>;

    /// Sheets owned by the chat in creation order.
    fn list_sheets(&self, chat_id: i64) -> AppResult<Vec<SheetSummary>>;

    fn get_sheet_owner(&self, sheet_id: Uuid) -> AppResult<Option<i64>>;
}

/// SQLite-backed [`BudgetStorage`]
#[derive(Clone)]
pub struct SqliteStorage {
    pool: DbPool,
}

impl SqliteStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

impl BudgetStorage for SqliteStorage {
    fn fetch_connected_sheet(&self, chat_id: i64) -> AppResult<Option<Uuid>> {
        let conn = self.conn()?;
        let sheet_id = conn
            .query_row(
                "SELECT sheet_id FROM current_sheet WHERE chat_id = ?1",
                params![chat_id],
                |row| uuid_column(row, 0),
            )
            .optional()?;
        Ok(sheet_id)
    }

    fn insert_sheet(&self, chat_id: i64, sheet_id: Uuid, name: &str, password: &str) -> AppResult<()> {
        let stored = PasswordHash::new(password);
        let sheet_id = sheet_id.to_string();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO sheet (sheet_id, owner_chat_id, name, password_hash, password_salt)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![sheet_id, chat_id, name, stored.hash, stored.salt],
        )?;
        tx.execute(
            "INSERT INTO current_sheet (chat_id, sheet_id) VALUES (?1, ?2)
             ON CONFLICT(chat_id) DO UPDATE SET sheet_id = excluded.sheet_id",
            params![chat_id, sheet_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn connect_chat_to_sheet(&self, chat_id: i64, sheet_id: Uuid) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO current_sheet (chat_id, sheet_id) VALUES (?1, ?2)
             ON CONFLICT(chat_id) DO UPDATE SET sheet_id = excluded.sheet_id",
            params![chat_id, sheet_id.to_string()],
        )?;
        Ok(())
    }

    fn disconnect_chat(&self, chat_id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM current_sheet WHERE chat_id = ?1", params![chat_id])?;
        Ok(())
    }

    fn check_password(&self, sheet_id: Uuid, password: &str) -> bool {
        let lookup = self.conn().and_then(|conn| {
            conn.query_row(
                "SELECT password_hash, password_salt FROM sheet WHERE sheet_id = ?1",
                params![sheet_id.to_string()],
                |row| {
                    Ok(PasswordHash {
                        hash: row.get(0)?,
                        salt: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
        });

        match lookup {
            Ok(Some(stored)) => stored.verify(password),
            Ok(None) => false,
            Err(e) => {
                log::warn!("Password lookup failed for sheet {}: {}", sheet_id, e);
                false
            }
        }
    }

    fn insert_category(&self, sheet_id: Uuid, category_id: Uuid, name: &str) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO category (category_id, sheet_id, name) VALUES (?1, ?2, ?3)",
            params![category_id.to_string(), sheet_id.to_string(), name],
        )?;
        Ok(())
    }

    fn find_category(&self, sheet_id: Uuid, name: &str) -> AppResult<Option<Uuid>> {
        let conn = self.conn()?;
        let category_id = conn
            .query_row(
                "SELECT category_id FROM category WHERE sheet_id = ?1 AND name = ?2 ORDER BY rowid LIMIT 1",
                params![sheet_id.to_string(), name],
                |row| uuid_column(row, 0),
            )
            .optional()?;
        Ok(category_id)
    }

    fn list_categories(&self, sheet_id: Uuid) -> AppResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM category WHERE sheet_id = ?1 ORDER BY rowid")?;
        let rows = stmt.query_map(params![sheet_id.to_string()], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    fn insert_payment(&self, payment: &NewPayment) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO payment (payment_id, sheet_id, category_id, amount, comment, payment_made_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                payment.payment_id.to_string(),
                payment.sheet_id.to_string(),
                payment.category_id.to_string(),
                payment.amount_minor,
                payment.comment,
                payment.occurred_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn list_sheets(&self, chat_id: i64) -> AppResult<Vec<SheetSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT sheet_id, name FROM sheet WHERE owner_chat_id = ?1 ORDER BY rowid")?;
        let rows = stmt.query_map(params![chat_id], |row| {
            Ok(SheetSummary {
                id: uuid_column(row, 0)?,
                name: row.get(1)?,
            })
        })?;

        let mut sheets = Vec::new();
        for row in rows {
            sheets.push(row?);
        }
        Ok(sheets)
    }

    fn get_sheet_owner(&self, sheet_id: Uuid) -> AppResult<Option<i64>> {
        let conn = self.conn()?;
        let owner = conn
            .query_row(
                "SELECT owner_chat_id FROM sheet WHERE sheet_id = ?1",
                params![sheet_id.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::db::create_in_memory_pool;
    use pretty_assertions::assert_eq;

    fn make_storage() -> SqliteStorage {
        SqliteStorage::new(create_in_memory_pool().unwrap())
    }

    fn payment_count(storage: &SqliteStorage) -> i64 {
        let conn = storage.conn().unwrap();
        conn.query_row("SELECT COUNT(*) FROM payment", [], |row| row.get(0))
            .unwrap()
    }

    // ── sheets ───────────────────────────────────────────────────────────────

    #[test]
    fn no_connected_sheet_is_not_an_error() {
        let storage = make_storage();
        assert_eq!(storage.fetch_connected_sheet(42).unwrap(), None);
    }

    #[test]
    fn insert_sheet_connects_owner() {
        let storage = make_storage();
        let sheet_id = Uuid::new_v4();
        storage.insert_sheet(42, sheet_id, "Budget", "secret1").unwrap();

        assert_eq!(storage.fetch_connected_sheet(42).unwrap(), Some(sheet_id));
        assert_eq!(storage.get_sheet_owner(sheet_id).unwrap(), Some(42));
    }

    #[test]
    fn failed_insert_sheet_leaves_no_association() {
        let storage = make_storage();
        let sheet_id = Uuid::new_v4();
        storage.insert_sheet(42, sheet_id, "Budget", "secret1").unwrap();

        // Same primary key again: the whole call fails and the chat keeps
        // its previous association.
        let other_chat_result = storage.insert_sheet(7, sheet_id, "Dup", "secret2");
        assert!(other_chat_result.is_err());
        assert_eq!(storage.fetch_connected_sheet(7).unwrap(), None);
    }

    #[test]
    fn password_is_checked_against_hash() {
        let storage = make_storage();
        let sheet_id = Uuid::new_v4();
        storage.insert_sheet(42, sheet_id, "Budget", "Secret1").unwrap();

        assert!(storage.check_password(sheet_id, "Secret1"));
        assert!(!storage.check_password(sheet_id, "secret1"));
        assert!(!storage.check_password(Uuid::new_v4(), "Secret1"));

        let conn = storage.conn().unwrap();
        let stored: String = conn
            .query_row("SELECT password_hash FROM sheet", [], |row| row.get(0))
            .unwrap();
        assert_ne!(stored, "Secret1");
    }

    #[test]
    fn connect_is_an_upsert_and_disconnect_removes_it() {
        let storage = make_storage();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        storage.insert_sheet(1, first, "First", "secret1").unwrap();
        storage.insert_sheet(1, second, "Second", "secret2").unwrap();

        storage.connect_chat_to_sheet(2, first).unwrap();
        storage.connect_chat_to_sheet(2, first).unwrap();
        assert_eq!(storage.fetch_connected_sheet(2).unwrap(), Some(first));

        storage.connect_chat_to_sheet(2, second).unwrap();
        assert_eq!(storage.fetch_connected_sheet(2).unwrap(), Some(second));

        storage.disconnect_chat(2).unwrap();
        assert_eq!(storage.fetch_connected_sheet(2).unwrap(), None);
        // Disconnecting twice is harmless
        storage.disconnect_chat(2).unwrap();
    }

    #[test]
    fn list_sheets_returns_only_owned_sheets_in_order() {
        let storage = make_storage();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        storage.insert_sheet(1, a, "Home", "secret1").unwrap();
        storage.insert_sheet(1, b, "Trip", "secret1").unwrap();
        storage.insert_sheet(2, Uuid::new_v4(), "Other", "secret1").unwrap();

        let sheets = storage.list_sheets(1).unwrap();
        assert_eq!(
            sheets,
            vec![
                SheetSummary {
                    id: a,
                    name: "Home".to_string()
                },
                SheetSummary {
                    id: b,
                    name: "Trip".to_string()
                },
            ]
        );
        assert!(storage.list_sheets(3).unwrap().is_empty());
    }

    // ── categories and payments ──────────────────────────────────────────────

    #[test]
    fn find_category_is_exact_and_scoped_to_sheet() {
        let storage = make_storage();
        let sheet = Uuid::new_v4();
        let other_sheet = Uuid::new_v4();
        storage.insert_sheet(1, sheet, "Home", "secret1").unwrap();
        storage.insert_sheet(1, other_sheet, "Trip", "secret1").unwrap();

        let groceries = Uuid::new_v4();
        storage.insert_category(sheet, groceries, "groceries").unwrap();

        assert_eq!(storage.find_category(sheet, "groceries").unwrap(), Some(groceries));
        assert_eq!(storage.find_category(sheet, "Groceries").unwrap(), None);
        assert_eq!(storage.find_category(sheet, "groceries ").unwrap(), None);
        assert_eq!(storage.find_category(other_sheet, "groceries").unwrap(), None);
    }

    #[test]
    fn list_categories_in_creation_order() {
        let storage = make_storage();
        let sheet = Uuid::new_v4();
        storage.insert_sheet(1, sheet, "Home", "secret1").unwrap();
        for name in ["rent", "groceries", "fun"] {
            storage.insert_category(sheet, Uuid::new_v4(), name).unwrap();
        }

        assert_eq!(storage.list_categories(sheet).unwrap(), vec!["rent", "groceries", "fun"]);
        assert!(storage.list_categories(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn insert_payment_stores_minor_units() {
        let storage = make_storage();
        let sheet = Uuid::new_v4();
        let category = Uuid::new_v4();
        storage.insert_sheet(1, sheet, "Home", "secret1").unwrap();
        storage.insert_category(sheet, category, "rent").unwrap();

        let payment = NewPayment {
            sheet_id: sheet,
            category_id: category,
            payment_id: Uuid::new_v4(),
            amount_minor: -550,
            comment: "rent".to_string(),
            occurred_at: Utc::now(),
        };
        storage.insert_payment(&payment).unwrap();
        assert_eq!(payment_count(&storage), 1);

        let conn = storage.conn().unwrap();
        let amount: i64 = conn
            .query_row("SELECT amount FROM payment", [], |row| row.get(0))
            .unwrap();
        assert_eq!(amount, -550);
    }

    #[test]
    fn insert_payment_for_unknown_category_fails() {
        let storage = make_storage();
        let sheet = Uuid::new_v4();
        storage.insert_sheet(1, sheet, "Home", "secret1").unwrap();

        let payment = NewPayment {
            sheet_id: sheet,
            category_id: Uuid::new_v4(),
            payment_id: Uuid::new_v4(),
            amount_minor: 100,
            comment: String::new(),
            occurred_at: Utc::now(),
        };
        assert!(storage.insert_payment(&payment).is_err());
        assert_eq!(payment_count(&storage), 0);
    }
}
