//! Error types for job-change feature preparation

use thiserror::Error;

/// Result type alias for preparation operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Missing value in column '{column}'")]
    MissingValue { column: String },

    #[error("Unseen category '{value}' in column '{column}'")]
    UnseenCategory { column: String, value: String },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Split error: {0}")]
    SplitError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        PrepError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::SerializationError(err.to_string())
    }
}
