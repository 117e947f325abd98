use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

/// Default data directory: `<platform data dir>/vitaltrack`, or `./data`
/// when the platform has no notion of one.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("vitaltrack"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub storage: StorageConfig,
    pub accounts: AccountConfig,
    pub rules: RulesConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `VITALTRACK_PROFILE`. When set (e.g. `CLINIC`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("VITALTRACK_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            storage: StorageConfig::from_env_profiled(p),
            accounts: AccountConfig::from_env_profiled(p),
            rules: RulesConfig::from_env_profiled(p),
        }
    }

    /// Config rooted at an explicit data directory, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            profile: String::new(),
            storage: StorageConfig {
                report_dir: data_dir.join("reports"),
                data_dir,
            },
            accounts: AccountConfig::default(),
            rules: RulesConfig::default(),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  storage:   data_dir={}, report_dir={}",
            self.storage.data_dir.display(), self.storage.report_dir.display());
        tracing::info!("  accounts:  admin_username={}", self.accounts.admin_username);
        tracing::info!("  rules:     path={}",
            self.rules.path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(built-in)".into()));
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for account documents and the CLI session.
    pub data_dir: PathBuf,
    /// Where exported reports land when no explicit path is given.
    pub report_dir: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        let data_dir = profiled_env_opt(p, "DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let report_dir = profiled_env_opt(p, "REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("reports"));
        Self { data_dir, report_dir }
    }

    /// Directory holding one JSON document per account.
    pub fn accounts_dir(&self) -> PathBuf {
        self.data_dir.join("accounts")
    }
}

// ── Accounts ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Login name (case-insensitive) that grants the admin role.
    pub admin_username: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self { admin_username: "admin".to_string() }
    }
}

impl AccountConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            admin_username: profiled_env_or(p, "ADMIN_USERNAME", "admin"),
        }
    }
}

// ── Classifier rules ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Optional YAML file overriding the built-in classifier thresholds.
    pub path: Option<PathBuf>,
}

impl RulesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            path: profiled_env_opt(p, "RULES_PATH").map(PathBuf::from),
        }
    }
}
