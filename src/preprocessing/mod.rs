//! Column transformer
//!
//! Turns a raw applicant record table into a fully numeric one:
//! - Nominal columns expanded into drop-first indicator columns
//! - Ordered or high-cardinality columns replaced by integer codes
//!   (data-derived vocabulary, or a fixed ordinal dictionary)
//! - Identifier columns removed
//!
//! The label column passes through unchanged.

mod config;
mod dummies;
mod encoder;
mod pipeline;

pub use config::{ColumnRole, ColumnTransformerConfig};
pub use dummies::DummyExpansion;
pub use encoder::{Categories, ColumnEncoder, EncodingStrategy, OrdinalMap, Vocabulary};
pub use pipeline::{
    drop_columns, encode_labels, process_all_labels, process_dummies_columns,
    process_education_level, process_enrolled_university, process_native_data,
    process_relevent_exp, ColumnTransformer, FittedColumnTransformer, FittedEncoder,
};

pub(crate) use encoder::numeric_values;
