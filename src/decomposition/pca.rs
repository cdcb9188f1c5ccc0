//! PCA: principal component analysis
//!
//! Linear dimensionality reduction onto the top-k eigenvectors of the
//! training covariance matrix. Labels are never consulted.

use super::linalg::{covariance, symmetric_eigen};
use crate::error::{PrepError, Result};
use ndarray::{s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Fitted projection state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PcaParams {
    mean: Array1<f64>,
    /// n_features x n_components
    components: Array2<f64>,
    explained_variance: Array1<f64>,
    explained_variance_ratio: Array1<f64>,
}

/// PCA dimensionality reduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pca {
    n_components: usize,
    params: Option<PcaParams>,
}

impl Pca {
    /// Create a new PCA keeping up to `n_components` components
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            params: None,
        }
    }

    /// Fit the projection on `x`.
    ///
    /// The number of kept components is capped by the feature and sample counts.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let (n, d) = x.dim();
        if n < 2 {
            return Err(PrepError::DataError("PCA requires at least 2 samples".to_string()));
        }
        if d < 1 {
            return Err(PrepError::DataError("PCA requires at least 1 feature".to_string()));
        }
        if self.n_components == 0 {
            return Err(PrepError::InvalidParameter {
                name: "n_components".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let k = self.n_components.min(d).min(n);

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PrepError::DataError("PCA requires at least 2 samples".to_string()))?;
        let centered = x - &mean;
        let cov = covariance(&centered);

        let (eigenvalues, eigenvectors) = symmetric_eigen(&cov)?;
        let eigenvalues = eigenvalues.mapv(|v| v.max(0.0));
        let total_variance = cov.diag().sum().max(1e-12);

        let explained_variance = eigenvalues.slice(s![..k]).to_owned();
        let explained_variance_ratio = &explained_variance / total_variance;

        self.params = Some(PcaParams {
            mean,
            components: eigenvectors.slice(s![.., ..k]).to_owned(),
            explained_variance,
            explained_variance_ratio,
        });
        Ok(self)
    }

    fn params(&self) -> Result<&PcaParams> {
        self.params.as_ref().ok_or(PrepError::ModelNotFitted)
    }

    /// Project `x` onto the fitted components
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let params = self.params()?;
        if x.ncols() != params.mean.len() {
            return Err(PrepError::ShapeError {
                expected: format!("{} features", params.mean.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok((x - &params.mean).dot(&params.components))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Number of components produced by `transform`
    pub fn n_components(&self) -> Option<usize> {
        self.params.as_ref().map(|p| p.components.ncols())
    }

    /// Principal axes as columns (n_features x n_components)
    pub fn components(&self) -> Option<&Array2<f64>> {
        self.params.as_ref().map(|p| &p.components)
    }

    pub fn explained_variance(&self) -> Option<&Array1<f64>> {
        self.params.as_ref().map(|p| &p.explained_variance)
    }

    pub fn explained_variance_ratio(&self) -> Option<&Array1<f64>> {
        self.params.as_ref().map(|p| &p.explained_variance_ratio)
    }
}
