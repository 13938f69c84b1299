//! Error types for Quiz Sentinel
//!
//! Analysis itself never fails: a session without enough evidence is reported
//! as `SuspicionLevel::InsufficientData`. These errors cover the boundaries
//! around it (parsing input documents, validating configuration, encoding
//! reports).

use thiserror::Error;

/// Errors that can occur outside the pure analysis path
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid event at index {index}: {reason}")]
    InvalidEvent { index: usize, reason: String },

    #[error("Timestamps go backwards at index {index}: {timestamp} < {previous}")]
    NonMonotonicTimestamps {
        index: usize,
        previous: i64,
        timestamp: i64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
