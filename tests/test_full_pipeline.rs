//! Integration test: Full pipeline (raw records → column transform → split & scale)

mod common;

use common::{init_tracing, raw_applicants};
use jobchange_prep::preparation::{
    feature_matrix, prepare_train_test_data, PreparedData, PreparerConfig, ReductionMode,
    SplitScalePreparer,
};
use jobchange_prep::preprocessing::process_native_data;
use jobchange_prep::PrepError;
use ndarray::{Array1, Axis};
use polars::prelude::*;

fn count(labels: &Array1<f64>, class: f64) -> usize {
    labels.iter().filter(|&&v| v == class).count()
}

/// Copy of `df` with every feature of the given rows moved far away
fn perturb_rows(df: &DataFrame, rows: &[usize]) -> DataFrame {
    let (x, y, names) = feature_matrix(df, "target").unwrap();
    let mut x = x;
    for &row in rows {
        for (j, value) in x.row_mut(row).iter_mut().enumerate() {
            *value += 1000.0 * (j + 1) as f64;
        }
    }

    let mut columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(j, name)| Series::new(name.as_str().into(), x.column(j).to_vec()).into_column())
        .collect();
    columns.push(Series::new("target".into(), y.to_vec()).into_column());
    DataFrame::new(columns).unwrap()
}

#[test]
fn test_end_to_end_twenty_applicants() {
    init_tracing();
    let raw = raw_applicants(20, 8);
    let processed = process_native_data(&raw).unwrap();

    let male: Vec<u8> = processed
        .column("gender_Male")
        .unwrap()
        .u8()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    assert_eq!(&male[..4], &[1, 0, 1, 0]);
    assert!(processed.column("enrollee_id").is_err());

    let prepared = prepare_train_test_data(&processed, None).unwrap();
    assert_eq!(prepared.x_train.nrows(), 14);
    assert_eq!(prepared.x_test.nrows(), 6);
    assert_eq!((count(&prepared.y_train, 0.0), count(&prepared.y_train, 1.0)), (8, 6));
    assert_eq!((count(&prepared.y_test, 0.0), count(&prepared.y_test, 1.0)), (4, 2));
    assert_eq!(prepared.feature_names.len(), 16);
    assert!(!prepared.feature_names.iter().any(|n| n == "target"));
}

#[test]
fn test_labels_follow_their_rows() {
    let processed = process_native_data(&raw_applicants(20, 8)).unwrap();
    let (_, y, _) = feature_matrix(&processed, "target").unwrap();
    let prepared = prepare_train_test_data(&processed, Some("pca")).unwrap();

    assert_eq!(prepared.y_train, y.select(Axis(0), &prepared.split.train));
    assert_eq!(prepared.y_test, y.select(Axis(0), &prepared.split.test));

    let mut all: Vec<usize> = prepared
        .split
        .train
        .iter()
        .chain(prepared.split.test.iter())
        .copied()
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..20).collect::<Vec<_>>());
}

#[test]
fn test_test_rows_never_influence_training_output() {
    let processed = process_native_data(&raw_applicants(20, 8)).unwrap();

    for mode in [ReductionMode::None, ReductionMode::Pca, ReductionMode::Lda] {
        let preparer = SplitScalePreparer::with_config(PreparerConfig::default().with_reduction(mode));
        let original = preparer.prepare(&processed).unwrap();
        let perturbed = preparer
            .prepare(&perturb_rows(&processed, &original.split.test))
            .unwrap();

        assert_eq!(original.split, perturbed.split, "{:?}", mode);
        assert_eq!(original.x_train, perturbed.x_train, "{:?}", mode);
        assert_eq!(original.y_train, perturbed.y_train, "{:?}", mode);
        assert_ne!(original.x_test, perturbed.x_test, "{:?}", mode);
    }
}

#[test]
fn test_split_is_reproducible() {
    let processed = process_native_data(&raw_applicants(40, 12)).unwrap();
    let first = prepare_train_test_data(&processed, Some("lda")).unwrap();
    let second = prepare_train_test_data(&processed, Some("lda")).unwrap();
    assert_eq!(first.split, second.split);
    assert_eq!(first.x_test, second.x_test);
}

#[test]
fn test_class_ratio_is_preserved() {
    let processed = process_native_data(&raw_applicants(100, 30)).unwrap();
    let PreparedData {
        y_train, y_test, ..
    } = prepare_train_test_data(&processed, None).unwrap();

    assert_eq!(y_train.len(), 70);
    assert_eq!(y_test.len(), 30);
    assert_eq!((count(&y_train, 0.0), count(&y_train, 1.0)), (49, 21));
    assert_eq!((count(&y_test, 0.0), count(&y_test, 1.0)), (21, 9));
}

#[test]
fn test_output_width_per_reduction() {
    let processed = process_native_data(&raw_applicants(20, 8)).unwrap();

    let widths: Vec<(usize, usize)> = [Some("pca"), Some("lda"), None, Some("umap")]
        .into_iter()
        .map(|mode| {
            let prepared = prepare_train_test_data(&processed, mode).unwrap();
            (prepared.x_train.ncols(), prepared.x_test.ncols())
        })
        .collect();
    assert_eq!(widths, vec![(5, 5), (1, 1), (16, 16), (16, 16)]);
}

#[test]
fn test_scaled_training_features_are_standardized() {
    let processed = process_native_data(&raw_applicants(20, 8)).unwrap();
    let prepared = prepare_train_test_data(&processed, None).unwrap();

    let means = prepared.x_train.mean_axis(Axis(0)).unwrap();
    let stds = prepared.x_train.std_axis(Axis(0), 0.0);
    for (mean, std) in means.iter().zip(stds.iter()) {
        assert!(mean.abs() < 1e-9);
        assert!(*std == 0.0 || (std - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_single_member_class_fails_split() {
    let processed = process_native_data(&raw_applicants(20, 1)).unwrap();
    let err = prepare_train_test_data(&processed, None).unwrap_err();
    assert!(matches!(err, PrepError::SplitError(_)));
}

#[test]
fn test_text_features_are_rejected_by_preparer() {
    let raw = raw_applicants(20, 8);
    assert!(prepare_train_test_data(&raw, None).is_err());
}
