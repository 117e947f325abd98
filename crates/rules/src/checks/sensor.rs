use serde::Serialize;
use vitaltrack_core::Reading;

use super::{Check, Verdict};
use crate::baseline::Baseline;
use crate::config::SensorLimits;

/// Which physiological limit a reading violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorFault {
    SystolicTooHigh,
    SystolicTooLow,
    DiastolicTooLow,
    PulsePressureTooNarrow,
}

/// Rejects readings no human body produces. Ignores the baseline.
#[derive(Debug, Clone)]
pub struct SensorCheck {
    limits: SensorLimits,
}

impl SensorCheck {
    pub fn new(limits: SensorLimits) -> Self {
        Self { limits }
    }

    pub fn faults(&self, reading: &Reading) -> Vec<SensorFault> {
        let l = &self.limits;
        let mut faults = Vec::new();
        if reading.systolic > l.max_systolic {
            faults.push(SensorFault::SystolicTooHigh);
        }
        if reading.systolic < l.min_systolic {
            faults.push(SensorFault::SystolicTooLow);
        }
        if reading.diastolic < l.min_diastolic {
            faults.push(SensorFault::DiastolicTooLow);
        }
        if reading.pulse_pressure() < l.min_pulse_pressure {
            faults.push(SensorFault::PulsePressureTooNarrow);
        }
        faults
    }
}

impl Check for SensorCheck {
    fn name(&self) -> &'static str {
        "sensor"
    }

    fn evaluate(&self, reading: &Reading, _baseline: &Baseline) -> Option<Verdict> {
        let faults = self.faults(reading);
        if faults.is_empty() {
            None
        } else {
            Some(Verdict::SensorError { faults })
        }
    }
}
