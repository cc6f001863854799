//! In-memory storage that records every call
//!
//! Passwords are kept in clear; hashing is covered by the SQLite storage
//! tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use budgetbot::core::error::{AppError, AppResult};
use budgetbot::storage::{BudgetStorage, NewPayment, SheetSummary};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct MockSheet {
    pub id: Uuid,
    pub owner: i64,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct MockCategory {
    pub sheet_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

#[derive(Default)]
struct State {
    sheets: Vec<MockSheet>,
    current: HashMap<i64, Uuid>,
    categories: Vec<MockCategory>,
    payments: Vec<NewPayment>,
}

#[derive(Default)]
pub struct MockStorage {
    state: Mutex<State>,
    calls: Mutex<Vec<String>>,
    fetch_count: AtomicUsize,
    failing: AtomicBool,
    fetch_delay: Mutex<Option<Duration>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fallible call returns an error while set
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Slows down hydration to widen race windows
    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Names of the calls made so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Adds a sheet directly, bypassing the router
    pub fn seed_sheet(&self, owner: i64, name: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().sheets.push(MockSheet {
            id,
            owner,
            name: name.to_string(),
            password: password.to_string(),
        });
        id
    }

    /// Sets the persisted current sheet of a chat
    pub fn seed_connection(&self, chat_id: i64, sheet_id: Uuid) {
        self.state.lock().unwrap().current.insert(chat_id, sheet_id);
    }

    pub fn seed_category(&self, sheet_id: Uuid, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().categories.push(MockCategory {
            sheet_id,
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn sheets(&self) -> Vec<MockSheet> {
        self.state.lock().unwrap().sheets.clone()
    }

    pub fn persisted_connection(&self, chat_id: i64) -> Option<Uuid> {
        self.state.lock().unwrap().current.get(&chat_id).copied()
    }

    pub fn payments(&self) -> Vec<NewPayment> {
        self.state.lock().unwrap().payments.clone()
    }

    fn record(&self, call: &str) -> AppResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::StorageUnavailable(format!("{} failed", call)));
        }
        Ok(())
    }
}

impl BudgetStorage for MockStorage {
    fn fetch_connected_sheet(&self, chat_id: i64) -> AppResult<Option<Uuid>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        self.record("fetch_connected_sheet")?;
        Ok(self.persisted_connection(chat_id))
    }

    fn insert_sheet(&self, chat_id: i64, sheet_id: Uuid, name: &str, password: &str) -> AppResult<()> {
        self.record("insert_sheet")?;
        let mut state = self.state.lock().unwrap();
        state.sheets.push(MockSheet {
            id: sheet_id,
            owner: chat_id,
            name: name.to_string(),
            password: password.to_string(),
        });
        state.current.insert(chat_id, sheet_id);
        Ok(())
    }

    fn connect_chat_to_sheet(&self, chat_id: i64, sheet_id: Uuid) -> AppResult<()> {
        self.record("connect_chat_to_sheet")?;
        self.state.lock().unwrap().current.insert(chat_id, sheet_id);
        Ok(())
    }

    fn disconnect_chat(&self, chat_id: i64) -> AppResult<()> {
        self.record("disconnect_chat")?;
        self.state.lock().unwrap().current.remove(&chat_id);
        Ok(())
    }

    fn check_password(&self, sheet_id: Uuid, password: &str) -> bool {
        if self.record("check_password").is_err() {
            return false;
        }
        let state = self.state.lock().unwrap();
        state.sheets.iter().any(|s| s.id == sheet_id && s.password == password)
    }

    fn insert_category(&self, sheet_id: Uuid, category_id: Uuid, name: &str) -> AppResult<()> {
        self.record("insert_category")?;
        self.state.lock().unwrap().categories.push(MockCategory {
            sheet_id,
            id: category_id,
            name: name.to_string(),
        });
        Ok(())
    }

    fn find_category(&self, sheet_id: Uuid, name: &str) -> AppResult<Option<Uuid>> {
        self.record("find_category")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .iter()
            .find(|c| c.sheet_id == sheet_id && c.name == name)
            .map(|c| c.id))
    }

    fn list_categories(&self, sheet_id: Uuid) -> AppResult<Vec<String>> {
        self.record("list_categories")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .iter()
            .filter(|c| c.sheet_id == sheet_id)
            .map(|c| c.name.clone())
            .collect())
    }

    fn insert_payment(&self, payment: &NewPayment) -> AppResult<()> {
        self.record("insert_payment")?;
        self.state.lock().unwrap().payments.push(payment.clone());
        Ok(())
    }

    fn list_sheets(&self, chat_id: i64) -> AppResult<Vec<SheetSummary>> {
        self.record("list_sheets")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .sheets
            .iter()
            .filter(|s| s.owner == chat_id)
            .map(|s| SheetSummary {
                id: s.id,
                name: s.name.clone(),
            })
            .collect())
    }

    fn get_sheet_owner(&self, sheet_id: Uuid) -> AppResult<Option<i64>> {
        self.record("get_sheet_owner")?;
        let state = self.state.lock().unwrap();
        Ok(state.sheets.iter().find(|s| s.id == sheet_id).map(|s| s.owner))
    }
}
