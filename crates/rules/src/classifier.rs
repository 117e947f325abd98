//! The classifier: an ordered chain of checks over a reading and the
//! user's prior history.

use tracing::debug;
use vitaltrack_core::{BaselineSample, Classification, Reading};

use crate::baseline::Baseline;
use crate::checks::{AnomalyCheck, Check, MedicalBand, MedicalCheck, SensorCheck, Verdict};
use crate::config::CompiledClassifierConfig;
use crate::error::ClassifyError;

/// Stateless reading classifier.
///
/// Holds only its thresholds; every call depends solely on its arguments,
/// so one instance can be shared freely across threads.
pub struct Classifier {
    checks: Vec<Box<dyn Check>>,
}

impl Classifier {
    /// Build the sensor → anomaly → medical chain from a compiled config.
    pub fn new(config: &CompiledClassifierConfig) -> Self {
        Self {
            checks: vec![
                Box::new(SensorCheck::new(config.sensor.clone())),
                Box::new(AnomalyCheck::new(config.anomaly.clone())),
                Box::new(MedicalCheck::new(config.bands.clone())),
            ],
        }
    }

    /// Names of the checks in evaluation order.
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run the chain and return the first verdict, with its details.
    ///
    /// Prior samples flagged as excluded from the baseline (sensor errors)
    /// are skipped before any statistics are computed.
    pub fn evaluate<S: BaselineSample>(
        &self,
        reading: &Reading,
        prior: &[S],
    ) -> Result<Verdict, ClassifyError> {
        if !reading.is_finite() {
            let field = if reading.systolic.is_finite() { "diastolic" } else { "systolic" };
            return Err(ClassifyError::NonFinite { field });
        }

        let baseline = Baseline::from_samples(prior);
        for check in &self.checks {
            if let Some(verdict) = check.evaluate(reading, &baseline) {
                debug!(check = check.name(), reading = %reading, "verdict reached");
                return Ok(verdict);
            }
        }

        // Unreachable with the standard chain: the medical check always answers.
        Ok(Verdict::Medical { band: MedicalBand::Normal })
    }

    /// Classify a reading against the user's prior history.
    pub fn classify<S: BaselineSample>(
        &self,
        systolic: f64,
        diastolic: f64,
        prior: &[S],
    ) -> Result<Classification, ClassifyError> {
        self.classify_reading(&Reading::new(systolic, diastolic), prior)
    }

    pub fn classify_reading<S: BaselineSample>(
        &self,
        reading: &Reading,
        prior: &[S],
    ) -> Result<Classification, ClassifyError> {
        self.evaluate(reading, prior).map(|v| v.classification())
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&CompiledClassifierConfig::default())
    }
}

/// Classify with the built-in thresholds.
pub fn classify<S: BaselineSample>(
    systolic: f64,
    diastolic: f64,
    prior: &[S],
) -> Result<Classification, ClassifyError> {
    Classifier::default().classify(systolic, diastolic, prior)
}
