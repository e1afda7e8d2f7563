//! Model evaluation module
//!
//! Each metric is an [`Evaluation`] strategy scoring predictions against
//! ground truth. [`MetricKind`] names the strategies for configuration and
//! the command line.

mod regression;

pub use regression::{Mse, Rmse, R2};

use crate::error::{PipelineError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scoring strategy over equal-length true/predicted vectors
pub trait Evaluation {
    fn kind(&self) -> MetricKind;

    /// Score `y_pred` against `y_true`.
    ///
    /// Both inputs must be non-empty and of equal length, otherwise a
    /// [`PipelineError::ShapeError`] is returned.
    fn calculate_score(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64>;
}

/// Available regression metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Mean squared error
    Mse,
    /// Root mean squared error
    Rmse,
    /// Coefficient of determination
    R2,
}

impl MetricKind {
    /// Name used as the tracking key
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Mse => "mse",
            MetricKind::Rmse => "rmse",
            MetricKind::R2 => "r2",
        }
    }

    /// Human-readable label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Mse => "MSE",
            MetricKind::Rmse => "RMSE",
            MetricKind::R2 => "R2",
        }
    }

    pub fn strategy(&self) -> Box<dyn Evaluation> {
        match self {
            MetricKind::Mse => Box::new(Mse),
            MetricKind::Rmse => Box::new(Rmse),
            MetricKind::R2 => Box::new(R2),
        }
    }

    /// Default metric order of a pipeline run
    pub fn defaults() -> Vec<MetricKind> {
        vec![MetricKind::Mse, MetricKind::R2, MetricKind::Rmse]
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub kind: MetricKind,
    pub value: f64,
}

/// Reject empty or mismatched inputs
pub(crate) fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(PipelineError::length_mismatch(
            "predictions",
            y_true.len(),
            y_pred.len(),
        ));
    }
    if y_true.is_empty() {
        return Err(PipelineError::ShapeError {
            expected: "at least one sample".to_string(),
            actual: "0 samples".to_string(),
        });
    }
    Ok(())
}
