use thiserror::Error;

use vitaltrack_rules::ClassifyError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("classification failed: {0}")]
    Classify(#[from] ClassifyError),

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("wrong password for '{0}'")]
    WrongPassword(String),

    #[error("'{0}' is reserved for the administrator")]
    ReservedName(String),
}
