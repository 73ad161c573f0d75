//! Error types for the APT repository library.

/// Result type for APT repository operations.
pub type Result<T> = std::result::Result<T, AptRepositoryError>;

/// Errors that can occur when composing APT repository index files.
#[derive(Debug, thiserror::Error)]
pub enum AptRepositoryError {
    /// Invalid package control data.
    #[error("Invalid package data: {0}")]
    InvalidPackageData(String),

    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Invalid field value.
    #[error("Invalid field value for '{field}': {value}")]
    InvalidField { field: String, value: String },
}

impl AptRepositoryError {
    /// Create a new invalid package data error.
    pub fn invalid_package<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPackageData(msg.into())
    }

    /// Create a new missing field error.
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        Self::MissingField(field.into())
    }

    /// Create a new invalid field error.
    pub fn invalid_field<S: Into<String>>(field: S, value: S) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }
}
