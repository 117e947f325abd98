//! Decision-procedure properties of the default classifier, checked over
//! sweeps of readings and histories.

use vitaltrack_core::Category;
use vitaltrack_rules::{classify, Classifier};

fn histories() -> Vec<Vec<f64>> {
    vec![
        vec![],
        vec![120.0],
        vec![110.0, 112.0],
        vec![110.0, 112.0, 108.0],
        vec![120.0, 120.0, 120.0],
        vec![90.0, 150.0, 210.0, 60.0],
    ]
}

fn is_impossible(sys: f64, dia: f64) -> bool {
    sys > 300.0 || dia < 20.0 || sys < 40.0 || (sys - dia) < 15.0
}

// ── Sensor-error precedence ─────────────────────────────────

#[test]
fn impossible_readings_are_sensor_errors_regardless_of_history() {
    for history in histories() {
        for sys in (0..=340).step_by(10).map(f64::from) {
            for dia in (0..=320).step_by(10).map(f64::from) {
                if !is_impossible(sys, dia) {
                    continue;
                }
                let c = classify(sys, dia, &history).unwrap();
                assert_eq!(
                    c.category,
                    Category::SensorError,
                    "{}/{} with history {:?}",
                    sys,
                    dia,
                    history
                );
            }
        }
    }
}

#[test]
fn sensor_error_wins_over_anomaly_and_medical() {
    let c = classify(310.0, 200.0, &[110.0, 112.0, 108.0]).unwrap();
    assert_eq!(c.category, Category::SensorError);
    assert_eq!(c.message, "SENSOR ERROR: Values outside human limits");
}

// ── Anomaly sample-size gate ────────────────────────────────

#[test]
fn short_histories_never_flag_anomalies() {
    for history in histories().into_iter().filter(|h| h.len() < 3) {
        for sys in (40..=300).step_by(5).map(f64::from) {
            for dia in (20..=200).step_by(5).map(f64::from) {
                if is_impossible(sys, dia) {
                    continue;
                }
                let c = classify(sys, dia, &history).unwrap();
                assert_ne!(c.category, Category::SecurityAnomaly, "{}/{}", sys, dia);
            }
        }
    }
}

#[test]
fn spike_at_the_systolic_limit_is_an_anomaly() {
    // 300 is not > 300, so the sensor check passes and the anomaly check takes over.
    let c = classify(300.0, 100.0, &[110.0, 112.0, 108.0]).unwrap();
    assert_eq!(c.category, Category::SecurityAnomaly);
    assert_eq!(c.message, "SECURITY ALERT: Possible Data Attack");
    assert_eq!(c.medical_label, "Anomalous Spike Detected");
    assert_eq!(c.severity_color, "#7f1d1d");
}

#[test]
fn flat_history_with_matching_reading_is_not_an_anomaly() {
    let c = classify(120.0, 80.0, &[120.0, 120.0, 120.0]).unwrap();
    assert_eq!(c.category, Category::Normal);
    assert_eq!(c.medical_label, "High (Stage 1)");
}

// ── Medical bands ───────────────────────────────────────────

#[test]
fn band_boundaries_with_empty_history() {
    let empty: &[f64] = &[];
    assert_eq!(classify(180.0, 70.0, empty).unwrap().medical_label, "CRISIS! Seek Medical Help");
    assert_eq!(
        classify(179.0, 70.0, empty).unwrap().medical_label,
        "High (Stage 2) - Seek Doctor"
    );
    assert_eq!(classify(120.0, 70.0, empty).unwrap().medical_label, "Elevated");
    assert_eq!(classify(110.0, 70.0, empty).unwrap().medical_label, "Normal");
}

// ── Determinism ─────────────────────────────────────────────

#[test]
fn identical_inputs_give_identical_results() {
    let classifier = Classifier::default();
    for history in histories() {
        let a = classifier.classify(120.0, 80.0, &history).unwrap();
        let b = classifier.classify(120.0, 80.0, &history.clone()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn classifier_is_shareable_across_threads() {
    let classifier = std::sync::Arc::new(Classifier::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let classifier = classifier.clone();
            std::thread::spawn(move || {
                classifier
                    .classify(120.0 + i as f64, 75.0, &[118.0, 121.0, 119.0])
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().category, Category::Normal);
    }
}
