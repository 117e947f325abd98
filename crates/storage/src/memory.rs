//! In-process history store, for tests and throwaway sessions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use vitaltrack_core::Record;

use crate::error::StorageError;
use crate::store::{AccountDocument, HistoryStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<BTreeMap<String, AccountDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn load(&self, username: &str) -> Result<Vec<Record>, StorageError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(username)
            .map(|doc| doc.records.clone())
            .unwrap_or_default())
    }

    async fn replace(&self, username: &str, records: Vec<Record>) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write().await;
        let doc = accounts
            .entry(username.to_string())
            .or_insert_with(|| AccountDocument::new(username));
        doc.records = records;
        doc.updated_at = Utc::now();
        Ok(())
    }

    async fn remove(&self, username: &str) -> Result<bool, StorageError> {
        Ok(self.accounts.write().await.remove(username).is_some())
    }

    async fn users(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.accounts.read().await.keys().cloned().collect())
    }

    async fn credential(&self, username: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(username)
            .and_then(|doc| doc.password_digest.clone()))
    }

    async fn set_credential(&self, username: &str, digest: String) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write().await;
        let doc = accounts
            .entry(username.to_string())
            .or_insert_with(|| AccountDocument::new(username));
        doc.password_digest = Some(digest);
        doc.updated_at = Utc::now();
        Ok(())
    }
}
