//! Standardization of feature matrices

use crate::error::{PrepError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Standard scaling (z-score normalization): (x - mean) / std
///
/// The standard deviation is the population one (ddof = 0). Features with
/// zero variance keep a scale of 1 so they map to 0 instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            mean: None,
            scale: None,
        }
    }

    /// Fit the scaler to the data
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let mean = x.mean_axis(Axis(0)).ok_or_else(|| {
            PrepError::DataError("cannot fit a scaler on zero rows".to_string())
        })?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(self)
    }

    fn params(&self) -> Result<(&Array1<f64>, &Array1<f64>)> {
        match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) => Ok((mean, scale)),
            _ => Err(PrepError::ModelNotFitted),
        }
    }

    fn check_width(&self, x: &Array2<f64>, expected: usize) -> Result<()> {
        if x.ncols() != expected {
            return Err(PrepError::ShapeError {
                expected: format!("{} features", expected),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(())
    }

    /// Transform the data
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, scale) = self.params()?;
        self.check_width(x, mean.len())?;

        let mut out = x.to_owned();
        out -= mean;
        out /= scale;
        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Map scaled values back to the original units
    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, scale) = self.params()?;
        self.check_width(x, mean.len())?;

        let mut out = x.to_owned();
        out *= scale;
        out += mean;
        Ok(out)
    }

    /// Per-feature means learned at fit time
    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    /// Per-feature scales learned at fit time
    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }
}
