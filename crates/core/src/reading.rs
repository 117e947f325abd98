use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classification::{Category, Classification};
use crate::error::VitalError;

/// Unique record identifier.
pub type RecordId = Uuid;

/// A single blood-pressure measurement in mmHg, as submitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub systolic: f64,
    pub diastolic: f64,
}

impl Reading {
    pub fn new(systolic: f64, diastolic: f64) -> Self {
        Self { systolic, diastolic }
    }

    /// Parse user-entered text into a reading.
    ///
    /// Rejects anything that is not a finite number, so the classifier only
    /// ever sees validated input.
    pub fn parse(systolic: &str, diastolic: &str) -> Result<Self, VitalError> {
        Ok(Self {
            systolic: parse_field("systolic", systolic)?,
            diastolic: parse_field("diastolic", diastolic)?,
        })
    }

    /// Difference between systolic and diastolic pressure.
    pub fn pulse_pressure(&self) -> f64 {
        self.systolic - self.diastolic
    }

    pub fn is_finite(&self) -> bool {
        self.systolic.is_finite() && self.diastolic.is_finite()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

fn parse_field(field: &'static str, input: &str) -> Result<f64, VitalError> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| VitalError::NotANumber {
        field,
        input: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(VitalError::NonFinite { field });
    }
    Ok(value)
}

/// Anything that can stand in for a prior reading when computing a
/// personal baseline.
pub trait BaselineSample {
    fn systolic(&self) -> f64;

    /// Whether this sample may contribute to the baseline statistics.
    fn counts_toward_baseline(&self) -> bool {
        true
    }
}

impl BaselineSample for Reading {
    fn systolic(&self) -> f64 {
        self.systolic
    }
}

impl BaselineSample for f64 {
    fn systolic(&self) -> f64 {
        *self
    }
}

/// A persisted reading: the measurement plus the classification it
/// received at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub systolic: f64,
    pub diastolic: f64,
    pub classification: Classification,
}

impl Record {
    pub fn new(reading: Reading, classification: Classification) -> Self {
        Self::at(Utc::now(), reading, classification)
    }

    /// Build a record with an explicit timestamp.
    pub fn at(timestamp: DateTime<Utc>, reading: Reading, classification: Classification) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            systolic: reading.systolic,
            diastolic: reading.diastolic,
            classification,
        }
    }

    pub fn reading(&self) -> Reading {
        Reading::new(self.systolic, self.diastolic)
    }

    pub fn category(&self) -> Category {
        self.classification.category
    }
}

impl BaselineSample for Record {
    fn systolic(&self) -> f64 {
        self.systolic
    }

    /// Sensor errors are stored flagged but never feed the baseline.
    fn counts_toward_baseline(&self) -> bool {
        self.classification.category != Category::SensorError
    }
}
