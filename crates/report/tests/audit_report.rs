//! End-to-end: classify readings, then render the admin audit and overview.

use chrono::{TimeZone, Utc};

use vitaltrack_core::{Reading, Record};
use vitaltrack_report::{
    account_audit_title, Integrity, Overview, ReportContext, ReportFormat, ReportRenderer,
    MASTER_AUDIT_TITLE,
};
use vitaltrack_rules::Classifier;

fn classified_history(readings: &[(f64, f64)]) -> Vec<Record> {
    let classifier = Classifier::default();
    let at = Utc.with_ymd_and_hms(2026, 4, 1, 7, 30, 0).unwrap();
    let mut history: Vec<Record> = Vec::new();
    for &(sys, dia) in readings {
        let reading = Reading::new(sys, dia);
        let classification = classifier.classify_reading(&reading, &history).unwrap();
        history.push(Record::at(at, reading, classification));
    }
    history
}

fn histories() -> Vec<(String, Vec<Record>)> {
    vec![
        (
            "alice".to_string(),
            classified_history(&[(110.0, 70.0), (112.0, 72.0), (108.0, 70.0), (300.0, 100.0)]),
        ),
        ("bob".to_string(), classified_history(&[(135.0, 85.0), (20.0, 10.0)])),
    ]
}

#[test]
fn master_audit_lists_every_account() {
    let now = Utc.with_ymd_and_hms(2026, 4, 2, 0, 0, 0).unwrap();
    let ctx = ReportContext::audit(MASTER_AUDIT_TITLE, "Root_Admin", &histories(), now);
    let out = ReportRenderer::new().unwrap().render(ReportFormat::Text, &ctx).unwrap();

    assert!(out.starts_with("Master Security Audit\n"));
    assert!(out.contains("Account"));
    assert!(out.contains("SECURITY ALERT: Possible Data Attack"));
    assert!(out.contains("High (Stage 1)"));
    assert!(out.contains("6 reading(s), 2 flagged"));
}

#[test]
fn single_account_audit_in_html() {
    let all = histories();
    let bob = &all[1];
    let ctx = ReportContext::audit(
        &account_audit_title(&bob.0),
        "Root_Admin",
        std::slice::from_ref(bob),
        Utc::now(),
    );
    let out = ReportRenderer::new().unwrap().render(ReportFormat::Html, &ctx).unwrap();
    assert!(out.contains("<title>Audit_bob</title>"));
    assert!(out.contains("<td>bob</td>"));
    assert!(!out.contains("<td>alice</td>"));
}

#[test]
fn overview_marks_compromised_accounts() {
    let overview = Overview::build(&histories());
    assert_eq!(overview.threats_detected, 1);
    assert_eq!(overview.account_rows[0].integrity, Integrity::Compromised);
    assert_eq!(overview.account_rows[1].integrity, Integrity::Secure);
    assert_eq!(overview.sensor_errors, 1);
}
