//! Salted password hashing for sheets

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Stored form of a sheet password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

impl PasswordHash {
    /// Hashes `password` with a fresh random salt.
    pub fn new(password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let hash = digest(&salt, password);
        Self { hash, salt }
    }

    /// Checks `password` against this stored hash.
    pub fn verify(&self, password: &str) -> bool {
        constant_time_eq(digest(&self.salt, password).as_bytes(), self.hash.as_bytes())
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
