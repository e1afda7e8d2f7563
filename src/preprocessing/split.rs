//! Train/test split strategy

use super::config::SplitConfig;
use super::DataStrategy;
use crate::error::{PipelineError, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Features and labels partitioned into train and test sets.
///
/// `train_rows` and `test_rows` hold the source row index of every row on
/// each side, in ascending order.
#[derive(Debug, Clone)]
pub struct FeatureLabelSplit {
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: Series,
    pub y_test: Series,
    pub train_rows: Vec<usize>,
    pub test_rows: Vec<usize>,
}

impl FeatureLabelSplit {
    pub fn n_train(&self) -> usize {
        self.train_rows.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_rows.len()
    }

    /// Feature column names, in table order
    pub fn feature_names(&self) -> Vec<String> {
        self.x_train
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Strategy for splitting data into train and test sets
#[derive(Debug, Clone, Default)]
pub struct DataSplitStrategy {
    config: SplitConfig,
}

impl DataSplitStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Shuffle `0..n_samples` and carve off the test rows.
    ///
    /// The first `ceil(test_size * n)` permuted indices go to the test set.
    pub fn split_indices(&self, n_samples: usize) -> Result<(Vec<usize>, Vec<usize>)> {
        let test_size = self.config.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(PipelineError::ConfigError(format!(
                "test_size must be in (0, 1), got {}",
                test_size
            )));
        }

        let n_test = (test_size * n_samples as f64).ceil() as usize;
        let n_train = n_samples.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(PipelineError::ShapeError {
                expected: "non-empty train and test sets".to_string(),
                actual: format!(
                    "{} samples split into {} train / {} test",
                    n_samples, n_train, n_test
                ),
            });
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_state);
        indices.shuffle(&mut rng);

        let mut test = indices[..n_test].to_vec();
        let mut train = indices[n_test..].to_vec();
        test.sort_unstable();
        train.sort_unstable();

        Ok((train, test))
    }
}

fn to_idx(rows: &[usize]) -> IdxCa {
    IdxCa::from_vec(
        "idx".into(),
        rows.iter().map(|&r| r as IdxSize).collect(),
    )
}

impl DataStrategy for DataSplitStrategy {
    type Output = FeatureLabelSplit;

    fn name(&self) -> &str {
        "split"
    }

    fn handle(&self, data: &DataFrame) -> Result<FeatureLabelSplit> {
        let label = self.config.label_column.as_str();

        let y = data
            .column(label)
            .map_err(|_| PipelineError::missing_column(label))?
            .as_materialized_series()
            .clone();
        let x = data.drop(label)?;

        let (train_rows, test_rows) = self.split_indices(data.height())?;
        let train_idx = to_idx(&train_rows);
        let test_idx = to_idx(&test_rows);

        Ok(FeatureLabelSplit {
            x_train: x.take(&train_idx)?,
            x_test: x.take(&test_idx)?,
            y_train: y.take(&train_idx)?,
            y_test: y.take(&test_idx)?,
            train_rows,
            test_rows,
        })
    }
}
