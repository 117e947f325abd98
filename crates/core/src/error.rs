use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitalError {
    #[error("Invalid {field}: '{input}' is not a number")]
    NotANumber { field: &'static str, input: String },

    #[error("Invalid {field}: value must be finite")]
    NonFinite { field: &'static str },
}
