//! Integration tests for the ledger over the JSON-file store: persistence
//! across instances, baseline handling of flagged readings, concurrent
//! submissions and account deletion.

use std::sync::Arc;

use vitaltrack_core::{Category, Config, Reading};
use vitaltrack_rules::{Classifier, ClassifierConfigRule};
use vitaltrack_storage::{FileStore, Ledger};

// ============================================================================
// Test Helpers
// ============================================================================

fn file_ledger(dir: &std::path::Path) -> Ledger {
    let config = Config::with_data_dir(dir);
    let store = FileStore::from_config(&config).unwrap();
    Ledger::new(Arc::new(store), Classifier::default())
}

async fn submit_all(ledger: &Ledger, user: &str, readings: &[(f64, f64)]) -> Vec<Category> {
    let mut categories = Vec::new();
    for &(sys, dia) in readings {
        let record = ledger.submit(user, Reading::new(sys, dia)).await.unwrap();
        categories.push(record.category());
    }
    categories
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn history_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let ledger = file_ledger(dir.path());
        ledger.login("alice", "secret").await.unwrap();
        submit_all(&ledger, "alice", &[(120.0, 80.0), (122.0, 79.0)]).await;
    }

    let ledger = file_ledger(dir.path());
    let history = ledger.history("alice").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].reading(), Reading::new(122.0, 79.0));
    assert!(ledger.login("alice", "secret").await.is_ok());
    assert!(ledger.login("alice", "guess").await.is_err());
}

// ============================================================================
// Classification against stored history
// ============================================================================

#[tokio::test]
async fn spike_after_stable_history_is_flagged_and_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = file_ledger(dir.path());

    let categories = submit_all(
        &ledger,
        "alice",
        &[(110.0, 70.0), (112.0, 72.0), (108.0, 70.0), (300.0, 100.0)],
    )
    .await;
    assert_eq!(
        categories,
        vec![Category::Normal, Category::Normal, Category::Normal, Category::SecurityAnomaly]
    );
    assert_eq!(ledger.history("alice").await.unwrap().len(), 4);
}

#[tokio::test]
async fn sensor_errors_are_stored_but_not_counted_in_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = file_ledger(dir.path());

    let categories = submit_all(
        &ledger,
        "bob",
        &[(118.0, 78.0), (500.0, 80.0), (120.0, 80.0), (30.0, 10.0), (190.0, 100.0)],
    )
    .await;
    // Only two valid readings precede the last one, so the spike is judged medically.
    assert_eq!(
        categories,
        vec![
            Category::Normal,
            Category::SensorError,
            Category::Normal,
            Category::SensorError,
            Category::Normal,
        ]
    );

    let history = ledger.history("bob").await.unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[4].classification.medical_label, "CRISIS! Seek Medical Help");
}

#[tokio::test]
async fn custom_thresholds_flow_through_the_ledger() {
    let yaml = r#"
apiVersion: v1
kind: ClassifierConfig
metadata:
  id: eager
  name: Eager anomaly trigger
spec:
  anomaly:
    min_history: 2
    z_score_trigger: 3.5
"#;
    let config = ClassifierConfigRule::from_yaml(yaml).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("accounts")).unwrap();
    let ledger = Ledger::new(Arc::new(store), Classifier::new(&config));

    let categories = submit_all(&ledger, "carol", &[(110.0, 70.0), (111.0, 70.0), (200.0, 90.0)]).await;
    assert_eq!(categories[2], Category::SecurityAnomaly);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_for_one_user_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(file_ledger(dir.path()));

    let mut handles = Vec::new();
    for i in 0..20 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .submit("dave", Reading::new(115.0 + (i % 5) as f64, 75.0))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(ledger.history("dave").await.unwrap().len(), 20);
}

// ============================================================================
// Admin operations
// ============================================================================

#[tokio::test]
async fn delete_account_leaves_other_users_intact() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = file_ledger(dir.path());
    submit_all(&ledger, "erin", &[(120.0, 80.0)]).await;
    submit_all(&ledger, "frank", &[(125.0, 82.0), (121.0, 79.0)]).await;

    assert!(ledger.delete_account("erin").await.unwrap());

    let all = ledger.histories().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].0, "frank");
    assert_eq!(all[0].1.len(), 2);
    assert_eq!(ledger.users().await.unwrap(), vec!["frank"]);
}
