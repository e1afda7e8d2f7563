//! Experiment Tracker Implementation
//!
//! Track parameters and metrics of a single pipeline run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::storage::{LocalStorage, StorageBackend};
use super::MetricsTracker;

/// A single logged metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(with = "non_finite")]
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            timestamp: Utc::now(),
        }
    }
}

/// Status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// A tracked pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: String,
    pub experiment_name: String,
    pub start_time: DateTime<Utc>,
    /// None while the run is active
    pub end_time: Option<DateTime<Utc>>,
    pub params: BTreeMap<String, String>,
    /// Latest value per metric
    #[serde(with = "non_finite::map")]
    pub metrics: BTreeMap<String, f64>,
    pub metrics_history: Vec<Metric>,
    pub status: RunStatus,
}

impl Run {
    pub fn new(experiment_name: impl Into<String>) -> Self {
        let start_time = Utc::now();
        Self {
            run_id: generate_run_id(&start_time),
            experiment_name: experiment_name.into(),
            start_time,
            end_time: None,
            params: BTreeMap::new(),
            metrics: BTreeMap::new(),
            metrics_history: Vec::new(),
            status: RunStatus::Running,
        }
    }

    /// Run duration in seconds, up to now if the run is still active
    pub fn duration_secs(&self) -> f64 {
        let end = self.end_time.unwrap_or_else(Utc::now);
        (end - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// JSON has no NaN or infinity: non-finite values are written as `null` and read back as NaN
mod non_finite {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    fn encode(value: f64) -> Option<f64> {
        value.is_finite().then_some(value)
    }

    fn decode(value: Option<f64>) -> f64 {
        value.unwrap_or(f64::NAN)
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        encode(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Option::<f64>::deserialize(deserializer).map(decode)
    }

    pub mod map {
        use std::collections::BTreeMap;

        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            values: &BTreeMap<String, f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_map(values.iter().map(|(name, v)| (name, super::encode(*v))))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<BTreeMap<String, f64>, D::Error> {
            let raw = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
            Ok(raw.into_iter().map(|(name, v)| (name, super::decode(v))).collect())
        }
    }
}

/// In-memory tracker for the active run
pub struct ExperimentTracker {
    run: RwLock<Run>,
}

impl ExperimentTracker {
    /// Start a new run under `experiment_name`
    pub fn new(experiment_name: impl Into<String>) -> Self {
        let run = Run::new(experiment_name);
        debug!(run_id = %run.run_id, "Started tracking run");
        Self {
            run: RwLock::new(run),
        }
    }

    /// Snapshot of the active run
    pub fn run(&self) -> Run {
        match self.run.read() {
            Ok(run) => run.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn run_id(&self) -> String {
        self.run().run_id
    }

    /// Latest value logged for `name`
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.run.read().ok().and_then(|r| r.metrics.get(name).copied())
    }

    pub fn param(&self, name: &str) -> Option<String> {
        self.run.read().ok().and_then(|r| r.params.get(name).cloned())
    }

    /// Close the run with `status`
    pub fn finish(&self, status: RunStatus) {
        if let Ok(mut run) = self.run.write() {
            run.end_time = Some(Utc::now());
            run.status = status;
            info!(
                run_id = %run.run_id,
                status = ?status,
                duration_secs = run.duration_secs(),
                "Run finished"
            );
        }
    }

    /// Write the run to `<dir>/<run_id>.json`.
    ///
    /// Storage failures are logged and reported as `None`.
    pub fn save(&self, dir: impl AsRef<Path>) -> Option<PathBuf> {
        let storage = LocalStorage::new(dir.as_ref());
        match storage.save_run(&self.run()) {
            Ok(path) => {
                info!("Run saved to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "Failed to save run");
                None
            }
        }
    }
}

impl MetricsTracker for ExperimentTracker {
    fn log_metric(&self, name: &str, value: f64) {
        if let Ok(mut run) = self.run.write() {
            run.metrics.insert(name.to_string(), value);
            run.metrics_history.push(Metric::new(name, value));
        }
    }

    fn log_param(&self, name: &str, value: &str) {
        if let Ok(mut run) = self.run.write() {
            run.params.insert(name.to_string(), value.to_string());
        }
    }
}

fn generate_run_id(start_time: &DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..0x10000);
    format!("run_{}_{:04x}", start_time.format("%Y%m%d_%H%M%S"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_basic() {
        let tracker = ExperimentTracker::new("customer_satisfaction");

        tracker.log_param("alpha", "0.5");
        tracker.log_metric("mse", 1.5);
        tracker.log_metric("mse", 1.25);

        let run = tracker.run();
        assert_eq!(run.experiment_name, "customer_satisfaction");
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(tracker.metric("mse"), Some(1.25));
        assert_eq!(tracker.param("alpha").as_deref(), Some("0.5"));
        assert_eq!(run.metrics_history.len(), 2);
        assert!(run.run_id.starts_with("run_"));
    }

    #[test]
    fn test_finish_sets_end_time() {
        let tracker = ExperimentTracker::new("exp");
        assert!(tracker.run().end_time.is_none());

        tracker.finish(RunStatus::Finished);

        let run = tracker.run();
        assert_eq!(run.status, RunStatus::Finished);
        assert!(run.end_time.is_some());
        assert!(run.duration_secs() >= 0.0);
    }

    #[test]
    fn test_save_writes_run_file() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = ExperimentTracker::new("exp");
        tracker.log_metric("r2", 0.8);
        tracker.finish(RunStatus::Finished);

        let path = tracker.save(dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap().to_string_lossy(), format!("{}.json", tracker.run_id()));
    }
}
