//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::sync::Arc;

use budgetbot::conversation::{ChatSession, Registry, Reply, Router};
use budgetbot::storage::BudgetStorage;
use uuid::Uuid;

/// Router with the standard handler set over the given storage
pub fn router_with(storage: Arc<dyn BudgetStorage>) -> Router {
    Router::new(Registry::standard().expect("standard registry"), storage)
}

/// One chat talking to a router
pub struct TestChat<'a> {
    pub router: &'a Router,
    pub chat_id: i64,
}

impl<'a> TestChat<'a> {
    pub fn new(router: &'a Router, chat_id: i64) -> Self {
        Self { router, chat_id }
    }

    pub async fn send(&self, text: &str) -> Reply {
        self.router.handle(self.chat_id, text).await
    }

    /// Sends each message in order and returns the last reply
    pub async fn send_all(&self, texts: &[&str]) -> Reply {
        let mut last = Reply::default();
        for text in texts {
            last = self.send(text).await;
        }
        last
    }

    /// Snapshot of the chat's session; the chat must have sent a message
    pub async fn session(&self) -> ChatSession {
        let shared = self.router.sessions().get(self.chat_id).expect("chat has a session");
        let session = shared.lock().await;
        session.clone()
    }

    /// Runs `f` against the live session
    pub async fn with_session<F: FnOnce(&mut ChatSession)>(&self, f: F) {
        let shared = self.router.sessions().get(self.chat_id).expect("chat has a session");
        let mut session = shared.lock().await;
        f(&mut session);
    }
}

/// Pulls the sheet id out of a "New sheet is created!" reply
pub fn sheet_id_from_reply(reply: &Reply) -> Uuid {
    let line = reply
        .text
        .lines()
        .find_map(|line| line.strip_prefix("ID: "))
        .expect("reply carries an ID line");
    Uuid::parse_str(line.trim()).expect("ID line is a UUID")
}
