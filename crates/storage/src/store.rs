//! The history store seam and the per-account document it persists.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitaltrack_core::Record;

use crate::error::StorageError;

/// Everything stored for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDocument {
    pub username: String,
    /// SHA-256 digest of the login password, set on first login.
    #[serde(default)]
    pub password_digest: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Readings in insertion (chronological) order.
    #[serde(default)]
    pub records: Vec<Record>,
}

impl AccountDocument {
    pub fn new(username: &str) -> Self {
        let now = Utc::now();
        Self {
            username: username.to_string(),
            password_digest: None,
            created_at: now,
            updated_at: now,
            records: Vec::new(),
        }
    }
}

/// Key-value persistence keyed by username.
///
/// Writes replace the whole history; there is no merge, so the last
/// writer wins. Callers that need read-modify-write go through
/// [`crate::Ledger`], which serializes them per user.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// All records for `username`, oldest first. Unknown users have none.
    async fn load(&self, username: &str) -> Result<Vec<Record>, StorageError>;

    /// Replace the full history for `username`, creating the account if needed.
    async fn replace(&self, username: &str, records: Vec<Record>) -> Result<(), StorageError>;

    /// Drop the account and everything stored for it. Returns whether it existed.
    async fn remove(&self, username: &str) -> Result<bool, StorageError>;

    /// Every known username, sorted.
    async fn users(&self) -> Result<Vec<String>, StorageError>;

    /// Stored password digest, if the account has logged in before.
    async fn credential(&self, username: &str) -> Result<Option<String>, StorageError>;

    async fn set_credential(&self, username: &str, digest: String) -> Result<(), StorageError>;
}
