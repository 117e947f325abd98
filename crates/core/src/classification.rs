use std::fmt;

use serde::{Deserialize, Serialize};

pub const SENSOR_ERROR_MESSAGE: &str = "SENSOR ERROR: Values outside human limits";
pub const SENSOR_ERROR_LABEL: &str = "Invalid Reading - Retest";
pub const SENSOR_ERROR_COLOR: &str = "#f59e0b";

pub const SECURITY_ANOMALY_MESSAGE: &str = "SECURITY ALERT: Possible Data Attack";
pub const SECURITY_ANOMALY_LABEL: &str = "Anomalous Spike Detected";
pub const SECURITY_ANOMALY_COLOR: &str = "#7f1d1d";

pub const VERIFIED_MESSAGE: &str = "Verified: Original Data";

/// Which branch of the classifier produced a result.
///
/// `Normal` means "no error or anomaly flag"; the medical severity of the
/// reading is carried separately in [`Classification::medical_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Normal,
    SensorError,
    SecurityAnomaly,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Normal => write!(f, "Normal"),
            Category::SensorError => write!(f, "SensorError"),
            Category::SecurityAnomaly => write!(f, "SecurityAnomaly"),
        }
    }
}

/// Outcome of classifying one reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Human-readable verification or alert message.
    pub message: String,
    /// Clinical category or diagnostic note.
    pub medical_label: String,
    /// Display color token, passed through verbatim.
    pub severity_color: String,
    pub category: Category,
}

impl Classification {
    /// Physiologically impossible reading.
    pub fn sensor_error() -> Self {
        Self {
            message: SENSOR_ERROR_MESSAGE.to_string(),
            medical_label: SENSOR_ERROR_LABEL.to_string(),
            severity_color: SENSOR_ERROR_COLOR.to_string(),
            category: Category::SensorError,
        }
    }

    /// Implausible jump relative to the user's own baseline.
    pub fn security_anomaly() -> Self {
        Self {
            message: SECURITY_ANOMALY_MESSAGE.to_string(),
            medical_label: SECURITY_ANOMALY_LABEL.to_string(),
            severity_color: SECURITY_ANOMALY_COLOR.to_string(),
            category: Category::SecurityAnomaly,
        }
    }

    /// Unflagged reading carrying a medical band label and color.
    pub fn verified(medical_label: impl Into<String>, severity_color: impl Into<String>) -> Self {
        Self {
            message: VERIFIED_MESSAGE.to_string(),
            medical_label: medical_label.into(),
            severity_color: severity_color.into(),
            category: Category::Normal,
        }
    }

    /// True for sensor errors and anomalies, which callers surface as alerts.
    pub fn is_flagged(&self) -> bool {
        self.category != Category::Normal
    }
}
