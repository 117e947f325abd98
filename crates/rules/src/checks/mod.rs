//! Ordered classification checks.
//!
//! Each check looks at the reading (and, if it cares, the baseline) and
//! either returns a [`Verdict`] or passes. The classifier runs them in
//! order and the first verdict wins.

pub mod anomaly;
pub mod medical;
pub mod sensor;

use serde::Serialize;
use vitaltrack_core::{Classification, Reading};

use crate::baseline::Baseline;

pub use anomaly::AnomalyCheck;
pub use medical::{MedicalBand, MedicalCheck};
pub use sensor::{SensorCheck, SensorFault};

/// The decision of whichever check matched first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Physiologically impossible; every violated limit is listed.
    SensorError { faults: Vec<SensorFault> },
    /// Statistical outlier against the user's own baseline.
    SecurityAnomaly { z_score: f64, mean: f64, std_dev: f64 },
    /// No flag; carries the medical band.
    Medical { band: MedicalBand },
}

impl Verdict {
    pub fn classification(&self) -> Classification {
        match self {
            Verdict::SensorError { .. } => Classification::sensor_error(),
            Verdict::SecurityAnomaly { .. } => Classification::security_anomaly(),
            Verdict::Medical { band } => Classification::verified(band.label(), band.color()),
        }
    }
}

/// One link in the classification chain.
pub trait Check: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Return a verdict to stop the chain, or `None` to defer to the next check.
    fn evaluate(&self, reading: &Reading, baseline: &Baseline) -> Option<Verdict>;
}
