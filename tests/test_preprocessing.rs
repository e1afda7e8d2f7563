//! Integration tests for the cleaning and split strategies

use satisfaction_pipeline::error::PipelineError;
use satisfaction_pipeline::preprocessing::{
    DataPreprocessingStrategy, DataSplitStrategy, DataStrategy, MissingColumnPolicy,
    PreprocessingConfig, SplitConfig,
};
use polars::prelude::*;
use std::collections::HashSet;

const MEASUREMENTS: [&str; 4] = [
    "product_weight_g",
    "product_length_cm",
    "product_height_cm",
    "product_width_cm",
];

fn orders_with_gaps(n: usize) -> DataFrame {
    let gap = |i: usize, every: usize, v: f64| if i % every == 0 { None } else { Some(v) };

    let weight: Vec<Option<f64>> = (0..n).map(|i| gap(i, 4, 100.0 + (i * 37 % 900) as f64)).collect();
    let length: Vec<Option<f64>> = (0..n).map(|i| gap(i, 5, 10.0 + (i * 7 % 40) as f64)).collect();
    let height: Vec<Option<f64>> = (0..n).map(|i| gap(i, 3, 2.0 + (i * 3 % 25) as f64)).collect();
    let width: Vec<Option<f64>> = (0..n).map(|i| gap(i, 6, 11.0 + (i * 5 % 30) as f64)).collect();
    let text: Vec<Option<&str>> = (0..n).map(|i| if i % 2 == 0 { None } else { Some("ok") }).collect();
    let timestamps: Vec<String> = (0..n).map(|i| format!("2018-01-{:02} 10:00:00", i % 28 + 1)).collect();
    let score: Vec<i64> = (0..n).map(|i| (i % 5) as i64 + 1).collect();
    let zip: Vec<i64> = (0..n).map(|i| 10_000 + i as i64).collect();
    let item: Vec<i64> = (0..n).map(|i| (i % 3) as i64 + 1).collect();

    df!(
        "order_purchase_timestamp" => &timestamps,
        "product_weight_g" => &weight,
        "product_length_cm" => &length,
        "product_height_cm" => &height,
        "product_width_cm" => &width,
        "review_comment_message" => &text,
        "review_score" => &score,
        "customer_zip_code_prefix" => &zip,
        "order_item_id" => &item
    )
    .unwrap()
}

fn median(values: &mut Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

// ============================================================================
// Median imputation
// ============================================================================

#[test]
fn test_imputed_cells_equal_column_median() {
    for n in [7usize, 12, 25] {
        let raw = orders_with_gaps(n);
        let cleaned = DataPreprocessingStrategy::new().handle(&raw).unwrap();

        for name in MEASUREMENTS {
            let before = raw.column(name).unwrap().f64().unwrap();
            let after = cleaned.column(name).unwrap().f64().unwrap();
            assert_eq!(after.null_count(), 0, "{name} still has nulls for n={n}");

            let mut observed: Vec<f64> = before.into_iter().flatten().collect();
            let expected = median(&mut observed);

            for (b, a) in before.into_iter().zip(after.into_iter()) {
                match b {
                    None => assert_eq!(a, Some(expected), "{name}: imputed value mismatch"),
                    Some(v) => assert_eq!(a, Some(v), "{name}: observed value changed"),
                }
            }
        }
    }
}

#[test]
fn test_preprocess_keeps_only_numeric_features_and_label() {
    let cleaned = DataPreprocessingStrategy::new()
        .handle(&orders_with_gaps(10))
        .unwrap();

    let names: Vec<String> = cleaned
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    let mut expected: Vec<String> = MEASUREMENTS.iter().map(|s| s.to_string()).collect();
    expected.push("review_score".to_string());
    assert_eq!(names, expected);
}

#[test]
fn test_absent_timestamp_is_ignored_by_default() {
    let raw = orders_with_gaps(8).drop("order_purchase_timestamp").unwrap();
    assert!(DataPreprocessingStrategy::new().handle(&raw).is_ok());
}

#[test]
fn test_absent_identifier_policy() {
    let raw = orders_with_gaps(8).drop("order_item_id").unwrap();

    let err = DataPreprocessingStrategy::new().handle(&raw).unwrap_err();
    assert!(matches!(err, PipelineError::SchemaError(_)));

    let lenient = PreprocessingConfig::default()
        .with_missing_identifier_policy(MissingColumnPolicy::Ignore);
    let cleaned = DataPreprocessingStrategy::with_config(lenient)
        .handle(&raw)
        .unwrap();
    assert!(cleaned.column("customer_zip_code_prefix").is_err());
}

// ============================================================================
// Split
// ============================================================================

#[test]
fn test_split_partitions_rows() {
    for n in [5usize, 10, 11, 33, 100] {
        let cleaned = DataPreprocessingStrategy::new()
            .handle(&orders_with_gaps(n))
            .unwrap();
        let split = DataSplitStrategy::new().handle(&cleaned).unwrap();

        assert_eq!(split.n_train() + split.n_test(), n);
        let expected_train = (n as f64 * 0.8).round() as i64;
        assert!((split.n_train() as i64 - expected_train).abs() <= 1, "n={n}");

        let train: HashSet<usize> = split.train_rows.iter().copied().collect();
        let test: HashSet<usize> = split.test_rows.iter().copied().collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(split.x_train.height(), split.y_train.len());
        assert!(split.x_train.column("review_score").is_err());
    }
}

#[test]
fn test_split_depends_only_on_seed() {
    let cleaned = DataPreprocessingStrategy::new()
        .handle(&orders_with_gaps(40))
        .unwrap();

    let a = DataSplitStrategy::new().handle(&cleaned).unwrap();
    let b = DataSplitStrategy::new().handle(&cleaned).unwrap();
    assert_eq!(a.test_rows, b.test_rows);
    assert!(a.x_test.equals_missing(&b.x_test));

    let other = DataSplitStrategy::with_config(SplitConfig::default().with_random_state(7))
        .handle(&cleaned)
        .unwrap();
    assert_ne!(a.test_rows, other.test_rows);
}

#[test]
fn test_split_rows_follow_source_order() {
    let cleaned = DataPreprocessingStrategy::new()
        .handle(&orders_with_gaps(20))
        .unwrap();
    let split = DataSplitStrategy::new().handle(&cleaned).unwrap();

    let labels = cleaned.column("review_score").unwrap().i64().unwrap();
    let y_test = split.y_test.i64().unwrap();
    for (pos, &row) in split.test_rows.iter().enumerate() {
        assert_eq!(y_test.get(pos), labels.get(row));
    }
}

#[test]
fn test_split_without_label_fails() {
    let cleaned = DataPreprocessingStrategy::new()
        .handle(&orders_with_gaps(10))
        .unwrap()
        .drop("review_score")
        .unwrap();

    let err = DataSplitStrategy::new().handle(&cleaned).unwrap_err();
    assert!(matches!(err, PipelineError::SchemaError(_)));
}
