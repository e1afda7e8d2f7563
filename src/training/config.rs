//! Training configuration

use super::models::ModelOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of model to train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Ordinary least squares / ridge linear regression
    LinearRegression,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::LinearRegression => f.write_str("linear_regression"),
        }
    }
}

/// Which estimator to train and the options handed to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub options: ModelOptions,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::LinearRegression,
            options: ModelOptions::new(),
        }
    }
}

impl ModelConfig {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Builder method to add one estimator option
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_serialize() {
        let json = serde_json::to_string(&ModelKind::LinearRegression).unwrap();
        assert_eq!(json, "\"linear_regression\"");
        assert_eq!(ModelKind::LinearRegression.to_string(), "linear_regression");
    }

    #[test]
    fn test_options_round_trip_verbatim() {
        let config = ModelConfig::default()
            .with_option("fit_intercept", false)
            .with_option("alpha", 0.1);

        let json = serde_json::to_string(&config).unwrap();
        let back: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.options["alpha"], serde_json::json!(0.1));
    }
}
