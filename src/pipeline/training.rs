//! End-to-end training pipeline

use super::PipelineConfig;
use crate::error::{LogFailure, Result, Stage};
use crate::evaluation::{MetricKind, MetricValue};
use crate::preprocessing::{DataCleaning, DataPreprocessingStrategy, DataSplitStrategy};
use crate::tracking::MetricsTracker;
use crate::training::{series_to_array1, FittedModel, LinearRegressionModel, Model, ModelKind};
use crate::utils::DataSource;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub model: String,
    /// Rows of the ingested table
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub feature_names: Vec<String>,
    /// Scores in configured order
    pub metrics: Vec<MetricValue>,
    pub duration_secs: f64,
}

impl PipelineReport {
    /// Score for `kind`, if it was computed
    pub fn metric(&self, kind: MetricKind) -> Option<f64> {
        self.metrics.iter().find(|m| m.kind == kind).map(|m| m.value)
    }
}

/// Ingest, clean, split, train and evaluate in a fixed order.
///
/// A failing step logs the stage it belongs to and aborts the run with the
/// original error.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: PipelineConfig,
}

impl TrainingPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run with the configured model
    pub fn run(&self, source: &dyn DataSource, tracker: &dyn MetricsTracker) -> Result<PipelineReport> {
        match self.config.model.kind {
            ModelKind::LinearRegression => self.run_with_model(source, &LinearRegressionModel, tracker),
        }
    }

    /// Run with a caller-supplied model
    pub fn run_with_model<M: Model>(
        &self,
        source: &dyn DataSource,
        model: &M,
        tracker: &dyn MetricsTracker,
    ) -> Result<PipelineReport> {
        let start = Instant::now();
        info!(source = %source.describe(), model = model.name(), "Starting pipeline run");

        // Ingest
        let raw = source.load().log_failure(Stage::Ingest, "load")?;
        let n_rows = raw.height();

        // Clean and split
        let preprocess = DataPreprocessingStrategy::with_config(self.config.preprocessing.clone());
        let cleaned = DataCleaning::new(raw, preprocess).handle_data()?;

        let divide = DataSplitStrategy::with_config(self.config.split.clone());
        let split = DataCleaning::new(cleaned, divide).handle_data()?;
        info!("Data cleaning and splitting complete");

        // Train
        tracker.log_param("model", model.name());
        for (name, value) in &self.config.model.options {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            tracker.log_param(name, &value);
        }

        let fitted = model
            .train(&split.x_train, &split.y_train, &self.config.model.options)
            .log_failure(Stage::Train, model.name())?;

        // Evaluate
        let y_pred = fitted
            .predict(&split.x_test)
            .log_failure(Stage::Evaluate, "predict")?;
        let y_true = series_to_array1(&split.y_test).log_failure(Stage::Evaluate, "labels")?;

        let mut metrics = Vec::with_capacity(self.config.metrics.len());
        for kind in &self.config.metrics {
            let value = kind
                .strategy()
                .calculate_score(&y_true, &y_pred)
                .log_failure(Stage::Evaluate, kind.as_str())?;
            tracker.log_metric(kind.as_str(), value);
            metrics.push(MetricValue { kind: *kind, value });
        }

        let duration_secs = start.elapsed().as_secs_f64();
        debug!(duration_secs, "Pipeline run complete");

        Ok(PipelineReport {
            model: model.name().to_string(),
            n_rows,
            n_train: split.n_train(),
            n_test: split.n_test(),
            feature_names: fitted.feature_names().to_vec(),
            metrics,
            duration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::preprocessing::PreprocessingConfig;
    use crate::tracking::ExperimentTracker;
    use polars::prelude::*;

    fn linear_frame() -> DataFrame {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let note: Vec<Option<&str>> = (0..20).map(|i| if i % 3 == 0 { None } else { Some("ok") }).collect();
        df!("x" => &x, "note" => &note, "review_score" => &y).unwrap()
    }

    fn bare_config() -> PipelineConfig {
        let preprocessing = PreprocessingConfig::default()
            .with_timestamp_columns(Vec::<String>::new())
            .with_median_columns(Vec::<String>::new())
            .with_text_fill("note", "none")
            .with_identifier_columns(Vec::<String>::new());
        PipelineConfig::default().with_preprocessing(preprocessing)
    }

    #[test]
    fn test_run_records_metrics() {
        let tracker = ExperimentTracker::new("test");
        let report = TrainingPipeline::new(bare_config())
            .run(&linear_frame(), &tracker)
            .unwrap();

        assert_eq!(report.n_rows, 20);
        assert_eq!(report.n_train, 16);
        assert_eq!(report.n_test, 4);
        assert_eq!(report.feature_names, vec!["x".to_string()]);

        let r2 = report.metric(MetricKind::R2).unwrap();
        assert!((r2 - 1.0).abs() < 1e-9);
        assert_eq!(tracker.metric("r2"), Some(r2));
        assert_eq!(tracker.param("model").as_deref(), Some("linear_regression"));
    }

    #[test]
    fn test_model_options_are_logged_as_params() {
        let mut config = bare_config();
        config.model = config.model.with_option("alpha", 0.5);

        let tracker = ExperimentTracker::new("test");
        TrainingPipeline::new(config).run(&linear_frame(), &tracker).unwrap();

        assert_eq!(tracker.param("alpha").as_deref(), Some("0.5"));
    }

    #[test]
    fn test_bad_option_aborts_before_evaluation() {
        let mut config = bare_config();
        config.model = config.model.with_option("max_depth", 3);

        let tracker = ExperimentTracker::new("test");
        let err = TrainingPipeline::new(config)
            .run(&linear_frame(), &tracker)
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidParameter { .. }));
        assert!(tracker.run().metrics.is_empty());
    }
}
