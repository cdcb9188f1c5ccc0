//! Split & scale preparer: numeric table to train/test feature matrices

use super::{
    config::{PreparerConfig, ReductionMode},
    scaler::StandardScaler,
    split::{SplitIndices, StratifiedSplit},
};
use crate::decomposition::{LinearDiscriminant, Pca};
use crate::error::{PrepError, Result};
use crate::preprocessing::numeric_values;
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Separate a numeric table into a feature matrix, a label vector and the
/// feature column names.
///
/// Every column except `target` becomes a feature, in table order.
pub fn feature_matrix(df: &DataFrame, target: &str) -> Result<(Array2<f64>, Array1<f64>, Vec<String>)> {
    let labels = df
        .column(target)
        .map_err(|_| PrepError::FeatureNotFound(target.to_string()))?;
    let y = Array1::from(numeric_values(labels.as_materialized_series())?);

    let features: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| c.name().as_str() != target)
        .collect();

    let mut x = Array2::<f64>::zeros((df.height(), features.len()));
    for (j, column) in features.iter().enumerate() {
        let values = numeric_values(column.as_materialized_series())?;
        x.column_mut(j).assign(&Array1::from(values));
    }

    let names = features.iter().map(|c| c.name().to_string()).collect();
    Ok((x, y, names))
}

/// A fitted projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reducer {
    Pca(Pca),
    Lda(LinearDiscriminant),
}

impl Reducer {
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        match self {
            Reducer::Pca(pca) => pca.transform(x),
            Reducer::Lda(lda) => lda.transform(x),
        }
    }
}

/// Scaler and optional projection, fitted on the training partition only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransforms {
    scaler: StandardScaler,
    reducer: Option<Reducer>,
}

impl FittedTransforms {
    /// Fit the scaler, then the configured projection on the scaled features
    pub fn fit(config: &PreparerConfig, x_train: &Array2<f64>, y_train: &Array1<f64>) -> Result<Self> {
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(x_train)?;

        let reducer = match config.reduction {
            ReductionMode::None => None,
            ReductionMode::Pca => {
                let mut pca = Pca::new(config.pca_components);
                pca.fit(&scaled)?;
                Some(Reducer::Pca(pca))
            }
            ReductionMode::Lda => {
                let mut lda = LinearDiscriminant::new(config.lda_components);
                lda.fit(&scaled, y_train)?;
                Some(Reducer::Lda(lda))
            }
        };

        Ok(Self { scaler, reducer })
    }

    /// Scale, then project if a projection was fitted
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let scaled = self.scaler.transform(x)?;
        match &self.reducer {
            Some(reducer) => reducer.transform(&scaled),
            None => Ok(scaled),
        }
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn reducer(&self) -> Option<&Reducer> {
        self.reducer.as_ref()
    }
}

/// Output of the preparer
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
    /// Feature columns before any projection
    pub feature_names: Vec<String>,
    /// Source row of every train and test sample
    pub split: SplitIndices,
}

impl PreparedData {
    /// `(x_train, y_train, x_test, y_test)`
    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>, Array2<f64>, Array1<f64>) {
        (self.x_train, self.y_train, self.x_test, self.y_test)
    }
}

/// Splits a numeric table, scales it and optionally projects it
#[derive(Debug, Clone, Default)]
pub struct SplitScalePreparer {
    config: PreparerConfig,
}

impl SplitScalePreparer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PreparerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreparerConfig {
        &self.config
    }

    /// Run split, scaling and projection on a fully numeric table.
    ///
    /// Every transform is fitted on the training rows and then applied to
    /// both partitions; test rows never reach a `fit` call.
    pub fn prepare(&self, df: &DataFrame) -> Result<PreparedData> {
        let start = Instant::now();
        self.config.validate()?;

        let (x, y, feature_names) = feature_matrix(df, &self.config.target_column)?;
        let split = StratifiedSplit::new(self.config.test_size, self.config.random_state).split(&y)?;

        let x_train = x.select(Axis(0), &split.train);
        let y_train = y.select(Axis(0), &split.train);
        let x_test = x.select(Axis(0), &split.test);
        let y_test = y.select(Axis(0), &split.test);

        let transforms = FittedTransforms::fit(&self.config, &x_train, &y_train)?;
        debug!(reduction = ?self.config.reduction, "fitted train-only transforms");

        let x_train = transforms.transform(&x_train)?;
        let x_test = transforms.transform(&x_test)?;

        info!(
            train = x_train.nrows(),
            test = x_test.nrows(),
            features = x_train.ncols(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "prepared train/test data"
        );

        Ok(PreparedData {
            x_train,
            y_train,
            x_test,
            y_test,
            feature_names,
            split,
        })
    }
}

/// Prepare train and test sets from a numeric table.
///
/// `reductioner` selects the projection: `"pca"`, `"lda"`, or anything else
/// for none. Split seed and sizes are the defaults of [`PreparerConfig`].
pub fn prepare_train_test_data(df: &DataFrame, reductioner: Option<&str>) -> Result<PreparedData> {
    let config = PreparerConfig::default().with_reduction(ReductionMode::parse(reductioner));
    SplitScalePreparer::with_config(config).prepare(df)
}
