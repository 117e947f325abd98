use tracing::debug;
use vitaltrack_core::Reading;

use super::{Check, Verdict};
use crate::baseline::Baseline;
use crate::config::AnomalySettings;

/// Flags a systolic value that jumps implausibly far from the user's own
/// baseline. This is a tamper heuristic, not a medical judgment.
#[derive(Debug, Clone)]
pub struct AnomalyCheck {
    settings: AnomalySettings,
}

impl AnomalyCheck {
    pub fn new(settings: AnomalySettings) -> Self {
        Self { settings }
    }
}

impl Check for AnomalyCheck {
    fn name(&self) -> &'static str {
        "anomaly"
    }

    fn evaluate(&self, reading: &Reading, baseline: &Baseline) -> Option<Verdict> {
        if baseline.len() < self.settings.min_history {
            return None;
        }

        let stats = baseline.stats();
        let z_score = stats.z_score(reading.systolic);
        debug!(
            samples = stats.count,
            mean = stats.mean,
            std_dev = stats.std_dev,
            z_score,
            "baseline comparison"
        );

        if z_score > self.settings.z_score_trigger {
            Some(Verdict::SecurityAnomaly {
                z_score,
                mean: stats.mean,
                std_dev: stats.std_dev,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check() -> AnomalyCheck {
        AnomalyCheck::new(AnomalySettings::default())
    }

    #[test]
    fn short_history_never_triggers() {
        let baseline = Baseline::from_samples(&[110.0, 111.0]);
        assert_eq!(check().evaluate(&Reading::new(290.0, 90.0), &baseline), None);
    }

    #[test]
    fn spike_against_tight_baseline() {
        let baseline = Baseline::from_samples(&[110.0, 112.0, 108.0]);
        match check().evaluate(&Reading::new(300.0, 100.0), &baseline) {
            Some(Verdict::SecurityAnomaly { z_score, mean, .. }) => {
                assert!((mean - 110.0).abs() < 1e-9);
                assert!((z_score - 116.35).abs() < 0.01);
            }
            other => panic!("expected anomaly, got {:?}", other),
        }
    }

    #[test]
    fn trigger_is_strict() {
        // flat baseline: std_dev substituted with 1, so z == |delta|
        let baseline = Baseline::from_samples(&[120.0, 120.0, 120.0]);
        assert_eq!(check().evaluate(&Reading::new(123.5, 80.0), &baseline), None);
        assert!(check().evaluate(&Reading::new(123.6, 80.0), &baseline).is_some());
    }

    #[test]
    fn custom_min_history() {
        let check = AnomalyCheck::new(AnomalySettings { min_history: 5, z_score_trigger: 3.5 });
        let baseline = Baseline::from_samples(&[110.0, 112.0, 108.0, 110.0]);
        assert_eq!(check.evaluate(&Reading::new(200.0, 90.0), &baseline), None);
    }
}
