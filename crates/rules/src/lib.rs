//! Blood-pressure reading classification.
//!
//! This crate provides:
//! - Sensor-limit, personal-baseline anomaly and medical-band checks
//! - A [`Classifier`] that runs them in order, first match wins
//! - YAML-loadable threshold config (`kind: ClassifierConfig`)

pub mod baseline;
pub mod checks;
pub mod classifier;
pub mod config;
pub mod error;

pub use baseline::{Baseline, BaselineStats};
pub use checks::{MedicalBand, SensorFault, Verdict};
pub use classifier::{classify, Classifier};
pub use config::{ClassifierConfigRule, ClassifierSpec, CompiledClassifierConfig};
pub use error::{ClassifyError, RuleError};
