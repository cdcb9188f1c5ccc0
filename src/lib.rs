//! Job-change feature preparation
//!
//! Prepares the job-change applicant dataset for a downstream classifier.
//!
//! # Modules
//!
//! - [`preprocessing`] - Column transformer: dummy expansion, label and
//!   ordinal encoding, identifier removal
//! - [`preparation`] - Stratified split, standardization and projection
//! - [`decomposition`] - Principal component and linear discriminant projections
//! - [`schema`] - Column names of the dataset
//!
//! # Example
//!
//! ```no_run
//! use jobchange_prep::prelude::*;
//! use polars::prelude::*;
//!
//! fn run(raw: &DataFrame) -> jobchange_prep::Result<()> {
//!     let numeric = ColumnTransformer::new().fit_transform(raw)?;
//!     let config = PreparerConfig::new().with_reduction(ReductionMode::Pca);
//!     let prepared = SplitScalePreparer::with_config(config).prepare(&numeric)?;
//!     let (x_train, y_train, x_test, y_test) = prepared.into_parts();
//!     # let _ = (x_train, y_train, x_test, y_test);
//!     Ok(())
//! }
//! ```

pub mod error;

pub mod decomposition;
pub mod preparation;
pub mod preprocessing;
pub mod schema;

pub use error::{PrepError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PrepError, Result};

    pub use crate::preprocessing::{
        ColumnEncoder, ColumnTransformer, ColumnTransformerConfig, EncodingStrategy,
        FittedColumnTransformer, OrdinalMap, Vocabulary,
    };

    pub use crate::preparation::{
        PreparedData, PreparerConfig, ReductionMode, SplitScalePreparer, StandardScaler,
        StratifiedSplit,
    };

    pub use crate::decomposition::{LinearDiscriminant, Pca};
}
