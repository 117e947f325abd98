//! JSON-file history store: one pretty-printed document per account.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use vitaltrack_core::{Config, Record};

use crate::credentials::username_tag;
use crate::error::StorageError;
use crate::store::{AccountDocument, HistoryStore};

/// Stores each account as `<accounts_dir>/<sanitized-name>-<tag>.json`.
///
/// The real username lives inside the document; the file name is only a
/// filesystem-safe key.
#[derive(Debug, Clone)]
pub struct FileStore {
    accounts_dir: PathBuf,
}

impl FileStore {
    /// Open (and create if missing) the accounts directory.
    pub fn new(accounts_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let accounts_dir = accounts_dir.into();
        std::fs::create_dir_all(&accounts_dir)?;
        info!("Storage: account documents at {}", accounts_dir.display());
        Ok(Self { accounts_dir })
    }

    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        Self::new(config.storage.accounts_dir())
    }

    fn path_for(&self, username: &str) -> PathBuf {
        self.accounts_dir
            .join(format!("{}-{}.json", sanitize_file_stem(username), username_tag(username)))
    }

    async fn read_document(&self, username: &str) -> Result<Option<AccountDocument>, StorageError> {
        let path = self.path_for(username);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write via a temp file and rename so a crash never leaves half a document.
    async fn write_document(&self, doc: &AccountDocument) -> Result<(), StorageError> {
        let path = self.path_for(&doc.username);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(doc)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(user = %doc.username, path = %path.display(), "account saved");
        Ok(())
    }

    async fn document_or_new(&self, username: &str) -> Result<AccountDocument, StorageError> {
        Ok(self
            .read_document(username)
            .await?
            .unwrap_or_else(|| AccountDocument::new(username)))
    }
}

#[async_trait]
impl HistoryStore for FileStore {
    async fn load(&self, username: &str) -> Result<Vec<Record>, StorageError> {
        Ok(self
            .read_document(username)
            .await?
            .map(|doc| doc.records)
            .unwrap_or_default())
    }

    async fn replace(&self, username: &str, records: Vec<Record>) -> Result<(), StorageError> {
        let mut doc = self.document_or_new(username).await?;
        doc.records = records;
        doc.updated_at = Utc::now();
        self.write_document(&doc).await
    }

    async fn remove(&self, username: &str) -> Result<bool, StorageError> {
        let path = self.path_for(username);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(user = %username, "account removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn users(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.accounts_dir).await?;
        let mut users = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let parsed = tokio::fs::read_to_string(&path)
                .await
                .map_err(StorageError::from)
                .and_then(|c| serde_json::from_str::<AccountDocument>(&c).map_err(StorageError::from));
            match parsed {
                Ok(doc) => users.push(doc.username),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable account"),
            }
        }
        users.sort();
        Ok(users)
    }

    async fn credential(&self, username: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .read_document(username)
            .await?
            .and_then(|doc| doc.password_digest))
    }

    async fn set_credential(&self, username: &str, digest: String) -> Result<(), StorageError> {
        let mut doc = self.document_or_new(username).await?;
        doc.password_digest = Some(digest);
        doc.updated_at = Utc::now();
        self.write_document(&doc).await
    }
}

/// Lowercase alphanumerics, everything else collapsed to single dashes.
fn sanitize_file_stem(username: &str) -> String {
    let truncated: String = username.chars().take(40).collect();
    let mut result = String::new();
    let mut prev_dash = false;
    for c in truncated.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash && !result.is_empty() {
            result.push('-');
            prev_dash = true;
        }
    }
    let trimmed = result.trim_end_matches('-');
    if trimmed.is_empty() {
        "account".to_string()
    } else {
        trimmed.to_string()
    }
}
