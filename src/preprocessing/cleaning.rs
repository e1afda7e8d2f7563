//! Cleaning strategy: drop, impute, restrict to numeric features

use super::config::{MissingColumnPolicy, PreprocessingConfig};
use super::imputer::{ImputeStrategy, Imputer};
use super::{is_numeric_dtype, DataStrategy};
use crate::error::{PipelineError, Result};
use polars::prelude::*;
use tracing::debug;

/// Strategy for preprocessing the raw orders table
#[derive(Debug, Clone, Default)]
pub struct DataPreprocessingStrategy {
    config: PreprocessingConfig,
}

impl DataPreprocessingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Keep only integer and floating point columns
    fn select_numeric(df: &DataFrame) -> Result<DataFrame> {
        let numeric: Vec<PlSmallStr> = df
            .get_columns()
            .iter()
            .filter(|c| is_numeric_dtype(c.dtype()))
            .map(|c| c.name().clone())
            .collect();

        Ok(df.select(numeric)?)
    }
}

/// Drop `columns` from `df` under `policy`
pub(crate) fn drop_columns(df: &DataFrame, columns: &[String], policy: MissingColumnPolicy) -> Result<DataFrame> {
    let mut result = df.clone();

    for name in columns {
        if result.get_column_index(name).is_none() {
            match policy {
                MissingColumnPolicy::Ignore => {
                    debug!(column = %name, "Column to drop is absent, skipping");
                    continue;
                }
                MissingColumnPolicy::Raise => return Err(PipelineError::missing_column(name)),
            }
        }
        result = result.drop(name)?;
    }

    Ok(result)
}

impl DataStrategy for DataPreprocessingStrategy {
    type Output = DataFrame;

    fn name(&self) -> &str {
        "preprocess"
    }

    fn handle(&self, data: &DataFrame) -> Result<DataFrame> {
        let cfg = &self.config;

        let data = drop_columns(data, &cfg.timestamp_columns, cfg.missing_timestamp_policy)?;

        // Medians come from the table as it stands after the drop
        let median_cols: Vec<&str> = cfg.median_columns.iter().map(String::as_str).collect();
        let data = Imputer::new(ImputeStrategy::Median).fit_transform(&data, &median_cols)?;

        let data = Imputer::new(ImputeStrategy::ConstantString(cfg.text_placeholder.clone()))
            .fit_transform(&data, &[cfg.text_column.as_str()])?;

        let data = Self::select_numeric(&data)?;
        let data = drop_columns(&data, &cfg.identifier_columns, cfg.missing_identifier_policy)?;

        debug!(rows = data.height(), cols = data.width(), "Preprocessing produced frame");
        Ok(data)
    }
}
