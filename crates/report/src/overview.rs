//! Aggregate usage statistics for the admin view.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use vitaltrack_core::{Category, Record};
use vitaltrack_rules::MedicalBand;

/// Whether an account has ever produced a security anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrity {
    Secure,
    Compromised,
}

impl fmt::Display for Integrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integrity::Secure => write!(f, "Secure"),
            Integrity::Compromised => write!(f, "Compromised"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub username: String,
    pub logs: usize,
    pub integrity: Integrity,
    pub sensor_errors: usize,
    /// Most severe medical band among verified readings.
    pub worst_band: Option<MedicalBand>,
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub username: String,
    pub timestamp: DateTime<Utc>,
    pub reading: String,
    pub status: String,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_records: usize,
    pub accounts: usize,
    /// Accounts with at least one reading.
    pub active_users: usize,
    pub threats_detected: usize,
    pub sensor_errors: usize,
    pub account_rows: Vec<AccountSummary>,
    /// Every record across accounts, newest first.
    pub activity: Vec<ActivityEntry>,
}

impl Overview {
    pub fn build(histories: &[(String, Vec<Record>)]) -> Self {
        let mut account_rows = Vec::with_capacity(histories.len());
        let mut activity = Vec::new();

        for (username, records) in histories {
            let count = |category: Category| records.iter().filter(|r| r.category() == category).count();
            let threats = count(Category::SecurityAnomaly);

            account_rows.push(AccountSummary {
                username: username.clone(),
                logs: records.len(),
                integrity: if threats > 0 { Integrity::Compromised } else { Integrity::Secure },
                sensor_errors: count(Category::SensorError),
                worst_band: records
                    .iter()
                    .filter(|r| r.category() == Category::Normal)
                    .filter_map(|r| MedicalBand::from_label(&r.classification.medical_label))
                    .max(),
                last_seen: records.iter().map(|r| r.timestamp).max(),
            });

            activity.extend(records.iter().map(|r| ActivityEntry {
                username: username.clone(),
                timestamp: r.timestamp,
                reading: r.reading().to_string(),
                status: r.classification.message.clone(),
                category: r.category(),
            }));
        }

        // Stable sort keeps per-account insertion order for equal timestamps.
        activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Self {
            total_records: account_rows.iter().map(|a| a.logs).sum(),
            accounts: account_rows.len(),
            active_users: account_rows.iter().filter(|a| a.logs > 0).count(),
            threats_detected: activity
                .iter()
                .filter(|e| e.category == Category::SecurityAnomaly)
                .count(),
            sensor_errors: account_rows.iter().map(|a| a.sensor_errors).sum(),
            account_rows,
            activity,
        }
    }

    /// The newest `limit` activity entries.
    pub fn recent_activity(&self, limit: usize) -> &[ActivityEntry] {
        &self.activity[..self.activity.len().min(limit)]
    }
}
