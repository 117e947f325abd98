//! ClassifierConfig rule kind: sensor limits, anomaly trigger and medical
//! band thresholds, loadable from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, RuleError};

pub const KIND: &str = "ClassifierConfig";

// ── YAML-level types ────────────────────────────────────────────────

/// Metadata block shared with other rule documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Top-level ClassifierConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: RuleMetadata,
    pub spec: ClassifierSpec,
}

/// Body of a ClassifierConfig rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClassifierSpec {
    #[serde(default)]
    pub sensor: SensorLimits,
    #[serde(default)]
    pub anomaly: AnomalySettings,
    #[serde(default)]
    pub bands: BandThresholds,
}

/// Physiological limits; anything outside is a sensor error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SensorLimits {
    /// systolic > this → error.
    pub max_systolic: f64,
    /// systolic < this → error.
    pub min_systolic: f64,
    /// diastolic < this → error.
    pub min_diastolic: f64,
    /// (systolic - diastolic) < this → error.
    pub min_pulse_pressure: f64,
}

impl Default for SensorLimits {
    fn default() -> Self {
        Self {
            max_systolic: 300.0,
            min_systolic: 40.0,
            min_diastolic: 20.0,
            min_pulse_pressure: 15.0,
        }
    }
}

/// Personal-baseline outlier detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnomalySettings {
    /// Minimum baseline entries before the check runs at all.
    pub min_history: usize,
    /// |z| strictly above this → anomaly.
    pub z_score_trigger: f64,
}

impl Default for AnomalySettings {
    fn default() -> Self {
        Self {
            min_history: 3,
            z_score_trigger: 3.5,
        }
    }
}

/// A band entered when either pressure reaches its threshold (inclusive).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EitherThreshold {
    pub systolic: f64,
    pub diastolic: f64,
}

/// Elevated band: systolic at or above the threshold AND diastolic below
/// its bound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ElevatedThreshold {
    pub systolic: f64,
    pub diastolic_below: f64,
}

/// Medical band thresholds, checked most severe first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BandThresholds {
    pub crisis: EitherThreshold,
    pub stage2: EitherThreshold,
    pub stage1: EitherThreshold,
    pub elevated: ElevatedThreshold,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            crisis: EitherThreshold { systolic: 180.0, diastolic: 120.0 },
            stage2: EitherThreshold { systolic: 140.0, diastolic: 90.0 },
            stage1: EitherThreshold { systolic: 130.0, diastolic: 80.0 },
            elevated: ElevatedThreshold { systolic: 120.0, diastolic_below: 80.0 },
        }
    }
}

// ── Compiled type ───────────────────────────────────────────────────

/// Validated classifier config.
pub type CompiledClassifierConfig = ClassifierSpec;

impl ClassifierConfigRule {
    /// Validate and compile the YAML config.
    pub fn compile(&self) -> Result<CompiledClassifierConfig> {
        if self.kind != KIND {
            return Err(RuleError::Validation(format!(
                "expected kind '{}', found '{}'",
                KIND, self.kind
            )));
        }
        self.spec.validate()?;
        Ok(self.spec.clone())
    }

    /// Parse a YAML string and compile it.
    pub fn from_yaml(yaml: &str) -> Result<CompiledClassifierConfig> {
        let rule: ClassifierConfigRule = serde_yaml::from_str(yaml)?;
        rule.compile()
    }

    /// Read, parse and compile a YAML file.
    pub fn load(path: &Path) -> Result<CompiledClassifierConfig> {
        let yaml = std::fs::read_to_string(path)?;
        let spec = Self::from_yaml(&yaml)?;
        info!(path = %path.display(), "classifier config loaded");
        Ok(spec)
    }
}

impl ClassifierSpec {
    /// Reject threshold sets that would make the decision procedure
    /// ambiguous or unreachable.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.thresholds() {
            if !value.is_finite() {
                return Err(RuleError::Validation(format!(
                    "{} must be a finite number, found {}",
                    field, value
                )));
            }
        }

        let s = &self.sensor;
        if s.min_systolic >= s.max_systolic {
            return Err(RuleError::Validation(format!(
                "sensor.min_systolic ({}) must be below sensor.max_systolic ({})",
                s.min_systolic, s.max_systolic
            )));
        }
        if !(self.anomaly.z_score_trigger > 0.0) {
            return Err(RuleError::Validation(
                "anomaly.z_score_trigger must be positive".into(),
            ));
        }
        if self.anomaly.min_history == 0 {
            return Err(RuleError::Validation(
                "anomaly.min_history must be at least 1".into(),
            ));
        }

        let b = &self.bands;
        let ascending = b.elevated.systolic <= b.stage1.systolic
            && b.stage1.systolic <= b.stage2.systolic
            && b.stage2.systolic <= b.crisis.systolic
            && b.stage1.diastolic <= b.stage2.diastolic
            && b.stage2.diastolic <= b.crisis.diastolic;
        if !ascending {
            return Err(RuleError::Validation(
                "band thresholds must ascend elevated <= stage1 <= stage2 <= crisis".into(),
            ));
        }
        Ok(())
    }

    /// Every numeric threshold with its YAML path.
    fn thresholds(&self) -> [(&'static str, f64); 12] {
        let (s, b) = (&self.sensor, &self.bands);
        [
            ("sensor.max_systolic", s.max_systolic),
            ("sensor.min_systolic", s.min_systolic),
            ("sensor.min_diastolic", s.min_diastolic),
            ("sensor.min_pulse_pressure", s.min_pulse_pressure),
            ("bands.crisis.systolic", b.crisis.systolic),
            ("bands.crisis.diastolic", b.crisis.diastolic),
            ("bands.stage2.systolic", b.stage2.systolic),
            ("bands.stage2.diastolic", b.stage2.diastolic),
            ("bands.stage1.systolic", b.stage1.systolic),
            ("bands.stage1.diastolic", b.stage1.diastolic),
            ("bands.elevated.systolic", b.elevated.systolic),
            ("bands.elevated.diastolic_below", b.elevated.diastolic_below),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED: &str = include_str!("../../../data/rules/classifier.yml");

    #[test]
    fn shipped_yaml_matches_defaults() {
        let spec = ClassifierConfigRule::from_yaml(SHIPPED).unwrap();
        assert_eq!(spec, ClassifierSpec::default());
    }

    #[test]
    fn parse_shipped_metadata() {
        let rule: ClassifierConfigRule = serde_yaml::from_str(SHIPPED).unwrap();
        assert_eq!(rule.kind, "ClassifierConfig");
        assert_eq!(rule.metadata.id, "default-classifier");
        assert_eq!(rule.metadata.tags.as_deref().map(|t| t.len()), Some(2));
    }

    #[test]
    fn omitted_sections_fall_back_to_defaults() {
        let yaml = r#"
apiVersion: v1
kind: ClassifierConfig
metadata:
  id: strict
  name: Strict anomaly trigger
spec:
  anomaly:
    min_history: 5
    z_score_trigger: 2.5
"#;
        let spec = ClassifierConfigRule::from_yaml(yaml).unwrap();
        assert_eq!(spec.anomaly.min_history, 5);
        assert_eq!(spec.anomaly.z_score_trigger, 2.5);
        assert_eq!(spec.sensor, SensorLimits::default());
        assert_eq!(spec.bands, BandThresholds::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = SHIPPED.replace("z_score_trigger", "z_trigger");
        assert!(matches!(
            ClassifierConfigRule::from_yaml(&yaml),
            Err(RuleError::Parse(_))
        ));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let yaml = SHIPPED.replace("kind: ClassifierConfig", "kind: TrendConfig");
        assert!(matches!(
            ClassifierConfigRule::from_yaml(&yaml),
            Err(RuleError::Validation(_))
        ));
    }

    #[test]
    fn descending_bands_are_rejected() {
        let mut spec = ClassifierSpec::default();
        spec.bands.stage1.systolic = 150.0;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn non_positive_trigger_is_rejected() {
        let mut spec = ClassifierSpec::default();
        spec.anomaly.z_score_trigger = 0.0;
        assert!(spec.validate().is_err());
        spec.anomaly.z_score_trigger = f64::NAN;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn non_finite_sensor_limit_is_rejected() {
        let yaml = SHIPPED.replace("max_systolic: 300.0", "max_systolic: .nan");
        match ClassifierConfigRule::from_yaml(&yaml) {
            Err(RuleError::Validation(msg)) => assert!(msg.contains("sensor.max_systolic")),
            other => panic!("expected validation error, got {:?}", other),
        }

        let yaml = SHIPPED.replace("min_pulse_pressure: 15.0", "min_pulse_pressure: .inf");
        assert!(matches!(
            ClassifierConfigRule::from_yaml(&yaml),
            Err(RuleError::Validation(_))
        ));
    }

    #[test]
    fn non_finite_band_threshold_is_rejected() {
        let mut spec = ClassifierSpec::default();
        spec.bands.crisis.diastolic = f64::INFINITY;
        assert!(spec.validate().is_err());

        let mut spec = ClassifierSpec::default();
        spec.bands.elevated.diastolic_below = f64::NAN;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.yml");
        std::fs::write(&path, SHIPPED).unwrap();
        let spec = ClassifierConfigRule::load(&path).unwrap();
        assert_eq!(spec.anomaly.z_score_trigger, 3.5);
    }
}
