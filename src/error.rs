//! Error taxonomy for the regresor pipeline
//!
//! Every validation failure is fail-fast and non-recoverable at the point of
//! detection: no partial config or partial training result is ever returned,
//! and nothing is retried. The surrounding CLI lets errors terminate the run.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the regresor pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed, missing, or contradictory configuration field,
    /// unresolvable model name, or invalid hyperparameter
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data shape or content problem in a supplied artifact
    #[error("Data validation error: {0}")]
    DataValidation(String),

    /// Estimator could not be initialized with the requested parameters
    #[error("Model initialization error: {0}")]
    ModelInitialization(String),

    /// Failure during fitting or cross-validated search
    #[error("Training error: {0}")]
    Training(String),

    /// Unsupported metric name or failure while scoring predictions
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Expected artifact missing or unwritable in the results directory
    #[error("File handling error: {0}")]
    FileHandling(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::FileHandling(format!("JSON serialization failed: {err}"))
    }
}
