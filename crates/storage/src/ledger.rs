//! Per-user read-classify-append-write around a [`HistoryStore`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, warn};

use vitaltrack_core::{Category, Identity, Reading, Record, ADMIN_DISPLAY_NAME};
use vitaltrack_rules::Classifier;

use crate::credentials::password_digest;
use crate::error::StorageError;
use crate::store::HistoryStore;

/// Owns the classifier and serializes every history mutation per user, so
/// two submissions for the same account inside one process can never lose
/// each other's record.
pub struct Ledger {
    store: Arc<dyn HistoryStore>,
    classifier: Classifier,
    admin_username: String,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl Ledger {
    pub fn new(store: Arc<dyn HistoryStore>, classifier: Classifier) -> Self {
        Self {
            store,
            classifier,
            admin_username: "admin".to_string(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Login name (case-insensitive) that grants the admin role.
    pub fn with_admin_username(mut self, name: impl Into<String>) -> Self {
        self.admin_username = name.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    async fn lock_user(&self, username: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks
                .entry(username.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry for `username` unless another task is holding or
    /// waiting on it. Call while holding the user's guard.
    fn forget_lock(&self, username: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map, one in the caller's guard.
        if locks.get(username).is_some_and(|lock| Arc::strong_count(lock) <= 2) {
            locks.remove(username);
        }
    }

    /// Resolve a login.
    ///
    /// The admin name maps to the admin identity. Any other name registers
    /// its password digest on first login and must match it afterwards.
    pub async fn login(&self, name: &str, password: &str) -> Result<Identity, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::EmptyUsername);
        }
        if name.eq_ignore_ascii_case(&self.admin_username) {
            info!("admin session started");
            return Ok(Identity::admin());
        }
        if name.eq_ignore_ascii_case(ADMIN_DISPLAY_NAME) {
            warn!(user = %name, "login with reserved admin name rejected");
            return Err(StorageError::ReservedName(name.to_string()));
        }
        if password.is_empty() {
            return Err(StorageError::EmptyPassword);
        }

        let _guard = self.lock_user(name).await;
        let digest = password_digest(name, password);
        match self.store.credential(name).await? {
            Some(stored) if stored == digest => {
                info!(user = %name, "login accepted");
            }
            Some(_) => {
                warn!(user = %name, "login rejected");
                return Err(StorageError::WrongPassword(name.to_string()));
            }
            None => {
                self.store.set_credential(name, digest).await?;
                info!(user = %name, "account registered");
            }
        }
        Ok(Identity::user(name))
    }

    /// Classify a reading against the user's history, append it and persist.
    pub async fn submit(&self, username: &str, reading: Reading) -> Result<Record, StorageError> {
        let _guard = self.lock_user(username).await;

        let mut history = self.store.load(username).await?;
        let classification = self.classifier.classify_reading(&reading, &history)?;
        let record = Record::new(reading, classification);

        match record.category() {
            Category::Normal => info!(
                user = %username,
                reading = %reading,
                label = %record.classification.medical_label,
                "reading recorded"
            ),
            category => warn!(
                user = %username,
                reading = %reading,
                %category,
                "flagged reading recorded"
            ),
        }

        history.push(record.clone());
        self.store.replace(username, history).await?;
        Ok(record)
    }

    pub async fn history(&self, username: &str) -> Result<Vec<Record>, StorageError> {
        self.store.load(username).await
    }

    /// Names of every stored account.
    pub async fn users(&self) -> Result<Vec<String>, StorageError> {
        self.store.users().await
    }

    /// Every account with its history, sorted by username.
    pub async fn histories(&self) -> Result<Vec<(String, Vec<Record>)>, StorageError> {
        let mut all = Vec::new();
        for user in self.store.users().await? {
            let records = self.store.load(&user).await?;
            all.push((user, records));
        }
        Ok(all)
    }

    /// Remove an account with its history and credential.
    pub async fn delete_account(&self, username: &str) -> Result<bool, StorageError> {
        let _guard = self.lock_user(username).await;
        let removed = self.store.remove(username).await?;
        if removed {
            info!(user = %username, "account deleted");
        }
        self.forget_lock(username);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use vitaltrack_core::Role;

    use super::*;
    use crate::memory::MemoryStore;

    fn ledger() -> Ledger {
        Ledger::new(Arc::new(MemoryStore::new()), Classifier::default())
    }

    #[tokio::test]
    async fn admin_name_is_case_insensitive() {
        let id = ledger().login("  ADMIN ", "").await.unwrap();
        assert_eq!(id.role, Role::Admin);
        assert_eq!(id.username, "Root_Admin");
    }

    #[tokio::test]
    async fn custom_admin_name() {
        let ledger = ledger().with_admin_username("chief");
        assert!(ledger.login("Chief", "").await.unwrap().is_admin());
        assert!(!ledger.login("admin", "pw").await.unwrap().is_admin());
    }

    #[tokio::test]
    async fn first_login_registers_then_must_match() {
        let ledger = ledger();
        let id = ledger.login(" alice ", "pw1").await.unwrap();
        assert_eq!(id, Identity::user("alice"));
        assert!(ledger.login("alice", "pw1").await.is_ok());
        assert!(matches!(
            ledger.login("alice", "other").await,
            Err(StorageError::WrongPassword(name)) if name == "alice"
        ));
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected() {
        let ledger = ledger();
        assert!(matches!(ledger.login("   ", "pw").await, Err(StorageError::EmptyUsername)));
        assert!(matches!(ledger.login("bob", "").await, Err(StorageError::EmptyPassword)));
    }

    #[tokio::test]
    async fn admin_display_name_is_reserved() {
        let ledger = ledger();
        assert!(matches!(
            ledger.login("Root_Admin", "pw").await,
            Err(StorageError::ReservedName(name)) if name == "Root_Admin"
        ));
        assert!(matches!(
            ledger.login(" root_admin ", "pw").await,
            Err(StorageError::ReservedName(_))
        ));
        assert!(ledger.users().await.unwrap().is_empty());
        assert!(ledger.login("admin", "").await.unwrap().is_admin());
    }

    #[tokio::test]
    async fn submit_appends_in_order() {
        let ledger = ledger();
        ledger.submit("alice", Reading::new(120.0, 80.0)).await.unwrap();
        ledger.submit("alice", Reading::new(118.0, 78.0)).await.unwrap();
        let history = ledger.history("alice").await.unwrap();
        let systolic: Vec<f64> = history.iter().map(|r| r.systolic).collect();
        assert_eq!(systolic, vec![120.0, 118.0]);
    }

    #[tokio::test]
    async fn delete_account_removes_history() {
        let ledger = ledger();
        ledger.submit("alice", Reading::new(120.0, 80.0)).await.unwrap();
        assert!(ledger.delete_account("alice").await.unwrap());
        assert!(ledger.history("alice").await.unwrap().is_empty());
        assert!(!ledger.delete_account("alice").await.unwrap());
    }

    #[tokio::test]
    async fn delete_account_releases_user_lock() {
        let ledger = ledger();
        ledger.submit("alice", Reading::new(120.0, 80.0)).await.unwrap();
        ledger.submit("bob", Reading::new(118.0, 78.0)).await.unwrap();
        assert_eq!(ledger.locks.lock().unwrap().len(), 2);

        assert!(ledger.delete_account("alice").await.unwrap());
        let locks = ledger.locks.lock().unwrap();
        assert!(!locks.contains_key("alice"));
        assert!(locks.contains_key("bob"));
    }
}
