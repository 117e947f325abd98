//! Error types for classification and rule-config loading.

/// Errors raised while loading or validating a classifier config.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Config parsed but its thresholds are inconsistent.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for rule-config operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// The only way classification can fail: input that is not a finite number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}
