//! Split & scale preparer
//!
//! Takes a fully numeric table with a label column and produces train/test
//! feature matrices and label vectors:
//! - Stratified, seeded train/test split
//! - Standardization fitted on the training partition
//! - Optional principal component or discriminant projection, also fitted
//!   on the training partition

mod config;
mod pipeline;
mod scaler;
mod split;

pub use config::{PreparerConfig, ReductionMode};
pub use pipeline::{
    feature_matrix, prepare_train_test_data, FittedTransforms, PreparedData, Reducer,
    SplitScalePreparer,
};
pub use scaler::StandardScaler;
pub use split::{SplitIndices, StratifiedSplit};
