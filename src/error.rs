//! Error types for the satisfaction pipeline

use std::fmt;

use thiserror::Error;
use tracing::error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Model not fitted")]
    ModelNotFitted,
}

impl PipelineError {
    /// Shorthand for a missing column
    pub fn missing_column(name: &str) -> Self {
        PipelineError::SchemaError(format!("column '{}' not found", name))
    }

    /// Shorthand for a length mismatch between two sequences
    pub fn length_mismatch(what: &str, expected: usize, actual: usize) -> Self {
        PipelineError::ShapeError {
            expected: format!("{} length = {}", what, expected),
            actual: format!("{} length = {}", what, actual),
        }
    }
}

impl From<polars::error::PolarsError> for PipelineError {
    fn from(err: polars::error::PolarsError) -> Self {
        match err {
            polars::error::PolarsError::ColumnNotFound(msg) => {
                PipelineError::SchemaError(msg.to_string())
            }
            other => PipelineError::DataError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::ConfigError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PipelineError {
    fn from(err: ndarray::ShapeError) -> Self {
        PipelineError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

/// Pipeline stage a failure is attributed to in the log trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Clean,
    Train,
    Evaluate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingest => "ingest",
            Stage::Clean => "clean",
            Stage::Train => "train",
            Stage::Evaluate => "evaluate",
        };
        f.write_str(name)
    }
}

/// Log-and-surface convention used at orchestration boundaries.
///
/// The error is emitted at `error` level with the stage and step that failed,
/// then returned unchanged to the caller.
pub trait LogFailure<T> {
    fn log_failure(self, stage: Stage, step: &str) -> Result<T>;
}

impl<T> LogFailure<T> for Result<T> {
    fn log_failure(self, stage: Stage, step: &str) -> Result<T> {
        if let Err(ref e) = self {
            error!(stage = %stage, step = step, error = %e, "Pipeline step failed");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::missing_column("review_score");
        assert_eq!(err.to_string(), "Schema error: column 'review_score' not found");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PipelineError = io_err.into();
        assert!(matches!(err, PipelineError::IoError(_)));
    }

    #[test]
    fn test_length_mismatch_message() {
        let err = PipelineError::length_mismatch("y", 8, 7);
        assert_eq!(
            err.to_string(),
            "Invalid shape: expected y length = 8, got y length = 7"
        );
    }

    #[test]
    fn test_log_failure_passes_error_through() {
        let res: Result<()> = Err(PipelineError::ModelNotFitted);
        let res = res.log_failure(Stage::Train, "linear_regression");
        assert!(matches!(res, Err(PipelineError::ModelNotFitted)));

        let ok: Result<u8> = Ok(3);
        assert_eq!(ok.log_failure(Stage::Ingest, "csv").unwrap(), 3);
    }
}
