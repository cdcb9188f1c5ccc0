//! Linear discriminant projection
//!
//! Finds directions maximizing between-class over within-class scatter by
//! solving the generalized eigenproblem `Sb w = λ Sw w`. The within-class
//! scatter is whitened through its Cholesky factor, which turns the problem
//! into an ordinary symmetric one.

use super::linalg::{cholesky, solve_lower, solve_lower_transposed, symmetric_eigen};
use crate::error::{PrepError, Result};
use ndarray::{s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ridge added to the within-class scatter, relative to its mean diagonal.
/// Standardized constant features leave zero rows in the scatter matrix.
const SHRINKAGE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LdaParams {
    classes: Vec<i64>,
    mean: Array1<f64>,
    /// n_features x n_components
    scalings: Array2<f64>,
    explained_variance_ratio: Array1<f64>,
}

/// Supervised linear dimensionality reduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearDiscriminant {
    n_components: usize,
    params: Option<LdaParams>,
}

impl LinearDiscriminant {
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            params: None,
        }
    }

    /// Fit the projection on features `x` with class labels `y`.
    ///
    /// At most `min(n_classes - 1, n_features)` components can be requested.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let (n, d) = x.dim();
        if n != y.len() {
            return Err(PrepError::ShapeError {
                expected: format!("{} labels", n),
                actual: format!("{} labels", y.len()),
            });
        }

        let mut class_rows: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in y.iter().enumerate() {
            class_rows.entry(label.round() as i64).or_default().push(idx);
        }

        let n_classes = class_rows.len();
        if n_classes < 2 {
            return Err(PrepError::InvalidParameter {
                name: "y".to_string(),
                value: format!("{} class", n_classes),
                reason: "discriminant projection needs at least 2 classes".to_string(),
            });
        }
        let max_components = (n_classes - 1).min(d);
        if self.n_components == 0 || self.n_components > max_components {
            return Err(PrepError::InvalidParameter {
                name: "n_components".to_string(),
                value: self.n_components.to_string(),
                reason: format!(
                    "must be between 1 and min(n_classes - 1, n_features) = {}",
                    max_components
                ),
            });
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PrepError::DataError("no samples to fit".to_string()))?;

        let mut within = Array2::<f64>::zeros((d, d));
        let mut between = Array2::<f64>::zeros((d, d));
        for rows in class_rows.values() {
            let members = x.select(Axis(0), rows);
            let class_mean = members
                .mean_axis(Axis(0))
                .ok_or_else(|| PrepError::DataError("empty class".to_string()))?;

            let centered = &members - &class_mean;
            within += &centered.t().dot(&centered);

            let offset = (&class_mean - &mean).insert_axis(Axis(1));
            between += &(offset.dot(&offset.t()) * rows.len() as f64);
        }

        // pooled within-class covariance, so projected classes have unit variance
        within /= (n.saturating_sub(n_classes)).max(1) as f64;

        let ridge = SHRINKAGE * (within.diag().sum() / d as f64).max(1.0);
        within.diag_mut().mapv_inplace(|v| v + ridge);

        let l = cholesky(&within)?;
        let half = solve_lower(&l, &between);
        let raw = solve_lower(&l, &half.t().to_owned());
        let whitened = (&raw + &raw.t()) / 2.0;

        let (eigenvalues, eigenvectors) = symmetric_eigen(&whitened)?;
        let eigenvalues = eigenvalues.mapv(|v| v.max(0.0));
        let k = self.n_components;

        let scalings = solve_lower_transposed(&l, &eigenvectors.slice(s![.., ..k]).to_owned());
        let total = eigenvalues.sum().max(1e-12);
        let explained_variance_ratio = eigenvalues.slice(s![..k]).mapv(|v| v / total);

        self.params = Some(LdaParams {
            classes: class_rows.into_keys().collect(),
            mean,
            scalings,
            explained_variance_ratio,
        });
        Ok(self)
    }

    fn params(&self) -> Result<&LdaParams> {
        self.params.as_ref().ok_or(PrepError::ModelNotFitted)
    }

    /// Project `x` onto the discriminant directions
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let params = self.params()?;
        if x.ncols() != params.mean.len() {
            return Err(PrepError::ShapeError {
                expected: format!("{} features", params.mean.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok((x - &params.mean).dot(&params.scalings))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Array2<f64>> {
        self.fit(x, y)?;
        self.transform(x)
    }

    pub fn n_components(&self) -> Option<usize> {
        self.params.as_ref().map(|p| p.scalings.ncols())
    }

    /// Class labels seen at fit time, ascending
    pub fn classes(&self) -> Option<&[i64]> {
        self.params.as_ref().map(|p| p.classes.as_slice())
    }

    /// Projection directions as columns (n_features x n_components)
    pub fn scalings(&self) -> Option<&Array2<f64>> {
        self.params.as_ref().map(|p| &p.scalings)
    }

    pub fn explained_variance_ratio(&self) -> Option<&Array1<f64>> {
        self.params.as_ref().map(|p| &p.explained_variance_ratio)
    }
}
