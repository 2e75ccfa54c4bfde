//! Error types for Performa

use thiserror::Error;

/// Errors that can occur while loading the model or producing a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Prediction failed: {message}")]
    PredictionFailure { message: String },

    #[error("Feature schema mismatch: expected {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },

    #[error("Invalid value for {field}: {value} (allowed range {min}-{max})")]
    InvalidInput {
        field: String,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
