//! Experiment tracking
//!
//! The pipeline reports parameters and scores through the [`MetricsTracker`]
//! trait. [`ExperimentTracker`] keeps them in memory for the active run and
//! persists the run as JSON through [`LocalStorage`].

mod storage;
mod tracker;

pub use storage::{LocalStorage, StorageBackend};
pub use tracker::{ExperimentTracker, Metric, Run, RunStatus};

/// Sink for run parameters and metrics.
///
/// Logging is fire-and-forget: implementations must not fail the caller.
pub trait MetricsTracker {
    fn log_metric(&self, name: &str, value: f64);

    fn log_param(&self, name: &str, value: &str);
}
