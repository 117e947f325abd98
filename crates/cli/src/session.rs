use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use vitaltrack_core::{Identity, Role};

const SESSION_FILE: &str = "session.toml";

/// The logged-in identity, persisted between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self {
            username: identity.username,
            role: identity.role,
            started_at: Utc::now(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            username: self.username.clone(),
            role: self.role,
        }
    }

    /// Return the session file path inside `data_dir`.
    pub fn file_path(data_dir: &Path) -> PathBuf {
        data_dir.join(SESSION_FILE)
    }

    /// Save the session to disk, replacing any previous one.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data dir: {}", data_dir.display()))?;
        let path = Self::file_path(data_dir);
        let body = toml::to_string_pretty(self).context("failed to serialize session")?;
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write session: {}", path.display()))?;
        debug!(user = %self.username, path = %path.display(), "Session saved");
        Ok(())
    }

    /// Load the current session, if anyone is logged in.
    pub fn load(data_dir: &Path) -> Result<Option<Self>> {
        let path = Self::file_path(data_dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read session: {}", path.display()))?;
        let session: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse session: {}", path.display()))?;
        Ok(Some(session))
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear(data_dir: &Path) -> Result<bool> {
        let path = Self::file_path(data_dir);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to remove session: {}", path.display())),
        }
    }
}

/// Greeting for the given local hour (0-23).
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning"
    } else if hour < 18 {
        "Good Afternoon"
    } else {
        "Good Evening"
    }
}
