//! Data cleaning orchestration

use super::DataStrategy;
use crate::error::{LogFailure, Result, Stage};
use polars::prelude::*;
use tracing::debug;

/// Applies one [`DataStrategy`] to one table.
///
/// Failures are logged with the strategy name and surfaced unchanged.
#[derive(Debug)]
pub struct DataCleaning<S: DataStrategy> {
    data: DataFrame,
    strategy: S,
}

impl<S: DataStrategy> DataCleaning<S> {
    pub fn new(data: DataFrame, strategy: S) -> Self {
        Self { data, strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Run the configured strategy
    pub fn handle_data(self) -> Result<S::Output> {
        debug!(
            strategy = self.strategy.name(),
            rows = self.data.height(),
            cols = self.data.width(),
            "Handling data"
        );
        self.strategy
            .handle(&self.data)
            .log_failure(Stage::Clean, self.strategy.name())
    }
}
