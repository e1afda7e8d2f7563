//! Pipeline configuration

use crate::error::{PipelineError, Result};
use crate::evaluation::MetricKind;
use crate::preprocessing::{PreprocessingConfig, SplitConfig};
use crate::training::ModelConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a pipeline run needs, loadable from a JSON file.
///
/// Every section is optional in the file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input table; the command line may supply it instead
    pub data_path: Option<PathBuf>,
    pub preprocessing: PreprocessingConfig,
    pub split: SplitConfig,
    pub model: ModelConfig,
    /// Metrics computed on the test partition, in order
    pub metrics: Vec<MetricKind>,
    pub experiment_name: String,
    /// Where run files are written; no file is written when unset
    pub tracking_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            preprocessing: PreprocessingConfig::default(),
            split: SplitConfig::default(),
            model: ModelConfig::default(),
            metrics: MetricKind::defaults(),
            experiment_name: "customer_satisfaction".to_string(),
            tracking_dir: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading pipeline config from {}", path.display());

        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject values no run could succeed with
    pub fn validate(&self) -> Result<()> {
        let test_size = self.split.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(PipelineError::ConfigError(format!(
                "test_size must be in (0, 1), got {}",
                test_size
            )));
        }
        if self.split.label_column.is_empty() {
            return Err(PipelineError::ConfigError(
                "label_column must not be empty".to_string(),
            ));
        }
        if self.metrics.is_empty() {
            return Err(PipelineError::ConfigError(
                "at least one metric is required".to_string(),
            ));
        }
        Ok(())
    }

    // Builder methods

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: PreprocessingConfig) -> Self {
        self.preprocessing = preprocessing;
        self
    }

    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<MetricKind>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_experiment_name(mut self, name: impl Into<String>) -> Self {
        self.experiment_name = name.into();
        self
    }

    pub fn with_tracking_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tracking_dir = Some(dir.into());
        self
    }
}
