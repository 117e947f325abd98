//! Data handed to report templates.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vitaltrack_core::Record;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// One table row: a record flattened to display strings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportRow {
    /// Owning account, shown only in multi-account reports.
    pub account: String,
    pub timestamp: String,
    /// `systolic/diastolic`.
    pub reading: String,
    pub diagnosis: String,
    pub status: String,
    pub color: String,
    pub flagged: bool,
}

impl ReportRow {
    pub fn from_record(account: &str, record: &Record) -> Self {
        Self {
            account: account.to_string(),
            timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            reading: record.reading().to_string(),
            diagnosis: record.classification.medical_label.clone(),
            status: record.classification.message.clone(),
            color: record.classification.severity_color.clone(),
            flagged: record.classification.is_flagged(),
        }
    }
}

/// Everything a report template can reference.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub title: String,
    pub generated_for: String,
    pub generated_at: String,
    pub show_accounts: bool,
    pub rows: Vec<ReportRow>,
    pub flagged: usize,
}

impl ReportContext {
    /// Report over one user's records, in stored order.
    pub fn personal(title: &str, username: &str, records: &[Record], now: DateTime<Utc>) -> Self {
        let rows = records
            .iter()
            .map(|r| ReportRow::from_record(username, r))
            .collect();
        Self::build(title, username, false, rows, now)
    }

    /// Report across several accounts, rows grouped by account.
    pub fn audit(
        title: &str,
        generated_for: &str,
        histories: &[(String, Vec<Record>)],
        now: DateTime<Utc>,
    ) -> Self {
        let rows = histories
            .iter()
            .flat_map(|(user, records)| records.iter().map(move |r| ReportRow::from_record(user, r)))
            .collect();
        Self::build(title, generated_for, true, rows, now)
    }

    fn build(
        title: &str,
        generated_for: &str,
        show_accounts: bool,
        rows: Vec<ReportRow>,
        now: DateTime<Utc>,
    ) -> Self {
        let flagged = rows.iter().filter(|r| r.flagged).count();
        Self {
            title: title.to_string(),
            generated_for: generated_for.to_string(),
            generated_at: now.format(TIMESTAMP_FORMAT).to_string(),
            show_accounts,
            rows,
            flagged,
        }
    }
}
