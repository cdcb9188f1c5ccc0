//! Split & scale configuration

use crate::error::{PrepError, Result};
use crate::schema;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Dimensionality reduction applied after scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionMode {
    /// Scaled features pass through unchanged
    #[default]
    None,
    /// Unsupervised principal component projection
    Pca,
    /// Supervised linear discriminant projection
    Lda,
}

impl ReductionMode {
    /// Interpret a reduction option the way callers pass it.
    ///
    /// `"pca"` and `"lda"` select a projection; anything else, including an
    /// absent value, means no reduction. Matching is case-sensitive.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => ReductionMode::None,
            Some("pca") => ReductionMode::Pca,
            Some("lda") => ReductionMode::Lda,
            Some(other) => {
                warn!(reduction = other, "unrecognized reduction mode, skipping reduction");
                ReductionMode::None
            }
        }
    }
}

/// Configuration for the split & scale preparer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparerConfig {
    /// Label column
    pub target_column: String,

    /// Fraction of rows held out for testing
    pub test_size: f64,

    /// Seed of the split shuffle
    pub random_state: u64,

    /// Projection fitted after scaling
    pub reduction: ReductionMode,

    /// Components kept by the principal component projection
    pub pca_components: usize,

    /// Components kept by the discriminant projection
    pub lda_components: usize,
}

impl Default for PreparerConfig {
    fn default() -> Self {
        Self {
            target_column: schema::TARGET.to_string(),
            test_size: 0.3,
            random_state: 1,
            reduction: ReductionMode::None,
            pca_components: 5,
            lda_components: 1,
        }
    }
}

impl PreparerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_reduction(mut self, reduction: ReductionMode) -> Self {
        self.reduction = reduction;
        self
    }

    pub fn with_pca_components(mut self, n: usize) -> Self {
        self.pca_components = n;
        self
    }

    pub fn with_lda_components(mut self, n: usize) -> Self {
        self.lda_components = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PrepError::InvalidParameter {
                name: "test_size".to_string(),
                value: self.test_size.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }
        for (name, value) in [
            ("pca_components", self.pca_components),
            ("lda_components", self.lda_components),
        ] {
            if value == 0 {
                return Err(PrepError::InvalidParameter {
                    name: name.to_string(),
                    value: value.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}
