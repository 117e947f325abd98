//! Reports over classified readings.
//!
//! This crate provides:
//! - `ReportContext`: records flattened into printable rows
//! - `ReportRenderer`: minijinja text and HTML report templates
//! - `Overview`: aggregate usage and integrity statistics for admins

pub mod context;
pub mod error;
pub mod overview;
pub mod templating;

pub use context::{ReportContext, ReportRow};
pub use error::ReportError;
pub use overview::{AccountSummary, ActivityEntry, Integrity, Overview};
pub use templating::{default_file_name, ReportFormat, ReportRenderer};

pub const PERSONAL_REPORT_TITLE: &str = "Personal Health Report";
pub const MASTER_AUDIT_TITLE: &str = "Master Security Audit";

/// Title of an admin export scoped to one account.
pub fn account_audit_title(username: &str) -> String {
    format!("Audit_{}", username)
}
