//! Satisfaction pipeline - customer satisfaction model training
//!
//! This crate trains a regression model predicting an order's review score
//! from tabular order records. Every step is a pluggable strategy:
//!
//! # Modules
//!
//! - [`utils`] - Data ingestion from delimited files or in-memory frames
//! - [`preprocessing`] - Column dropping, imputation and train/test splitting
//! - [`training`] - Model trait and the linear regression estimator
//! - [`evaluation`] - Regression metrics (MSE, RMSE, R2)
//! - [`tracking`] - Experiment tracking of params and metrics
//! - [`pipeline`] - The end-to-end driver and its configuration
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

pub mod utils;
pub mod preprocessing;
pub mod training;
pub mod evaluation;
pub mod tracking;
pub mod pipeline;

pub mod cli;

pub use error::{PipelineError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PipelineError, Result};

    // Ingestion
    pub use crate::utils::{DataSource, IngestData};

    // Preprocessing
    pub use crate::preprocessing::{
        DataCleaning, DataPreprocessingStrategy, DataSplitStrategy, DataStrategy, FeatureLabelSplit,
        MissingColumnPolicy, PreprocessingConfig, SplitConfig,
    };

    // Training
    pub use crate::training::{FittedModel, LinearRegression, LinearRegressionModel, Model, ModelConfig, ModelKind, ModelOptions};

    // Evaluation
    pub use crate::evaluation::{Evaluation, MetricKind, MetricValue, Mse, Rmse, R2};

    // Experiment tracking
    pub use crate::tracking::{ExperimentTracker, MetricsTracker, RunStatus};

    // Pipeline
    pub use crate::pipeline::{PipelineConfig, PipelineReport, TrainingPipeline};
}
