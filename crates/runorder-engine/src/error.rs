//! Error types for running-order analysis.
//!
//! Evidence problems (missing detections, disagreeing strategies, failed
//! validations) are data conditions and never surface here; they lower
//! confidence or land in the result's disagreement list. These variants
//! cover genuine faults: unusable input documents and bad configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur before or around an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid episode duration: {0}")]
    InvalidDuration(f64),

    #[error("Invalid evidence: {0}")]
    InvalidEvidence(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Evidence file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Create an invalid evidence error.
    pub fn invalid_evidence(message: impl Into<String>) -> Self {
        Self::InvalidEvidence(message.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
