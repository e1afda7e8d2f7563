//! Model training module
//!
//! Estimators sit behind the [`Model`] trait; training returns a
//! [`FittedModel`] that predicts from a feature frame. The crate ships one
//! estimator family, [`LinearRegressionModel`].

mod config;
mod models;
pub mod linear_models;

pub use config::{ModelConfig, ModelKind};
pub use linear_models::{LinearRegression, LinearRegressionModel};
pub use models::{column_names, columns_to_array2, series_to_array1, FittedModel, Model, ModelOptions};
