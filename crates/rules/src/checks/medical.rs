use std::fmt;

use serde::{Deserialize, Serialize};
use vitaltrack_core::Reading;

use super::{Check, Verdict};
use crate::baseline::Baseline;
use crate::config::BandThresholds;

/// Clinical blood-pressure band, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalBand {
    Normal,
    Elevated,
    HighStage1,
    HighStage2,
    Crisis,
}

impl MedicalBand {
    pub fn label(&self) -> &'static str {
        match self {
            MedicalBand::Normal => "Normal",
            MedicalBand::Elevated => "Elevated",
            MedicalBand::HighStage1 => "High (Stage 1)",
            MedicalBand::HighStage2 => "High (Stage 2) - Seek Doctor",
            MedicalBand::Crisis => "CRISIS! Seek Medical Help",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MedicalBand::Normal => "#22c55e",
            MedicalBand::Elevated => "#84cc16",
            MedicalBand::HighStage1 => "#eab308",
            MedicalBand::HighStage2 => "#f97316",
            MedicalBand::Crisis => "#ef4444",
        }
    }

    /// Recover the band from a stored medical label.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            MedicalBand::Normal,
            MedicalBand::Elevated,
            MedicalBand::HighStage1,
            MedicalBand::HighStage2,
            MedicalBand::Crisis,
        ]
        .into_iter()
        .find(|b| b.label() == label)
    }
}

impl fmt::Display for MedicalBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Threshold banding. Always produces a verdict, so it terminates the chain.
#[derive(Debug, Clone)]
pub struct MedicalCheck {
    bands: BandThresholds,
}

impl MedicalCheck {
    pub fn new(bands: BandThresholds) -> Self {
        Self { bands }
    }

    pub fn band(&self, reading: &Reading) -> MedicalBand {
        let b = &self.bands;
        let (sys, dia) = (reading.systolic, reading.diastolic);
        if sys >= b.crisis.systolic || dia >= b.crisis.diastolic {
            MedicalBand::Crisis
        } else if sys >= b.stage2.systolic || dia >= b.stage2.diastolic {
            MedicalBand::HighStage2
        } else if sys >= b.stage1.systolic || dia >= b.stage1.diastolic {
            MedicalBand::HighStage1
        } else if sys >= b.elevated.systolic && dia < b.elevated.diastolic_below {
            MedicalBand::Elevated
        } else {
            MedicalBand::Normal
        }
    }
}

impl Check for MedicalCheck {
    fn name(&self) -> &'static str {
        "medical"
    }

    fn evaluate(&self, reading: &Reading, _baseline: &Baseline) -> Option<Verdict> {
        Some(Verdict::Medical { band: self.band(reading) })
    }
}
