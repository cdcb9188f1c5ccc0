//! Column transformer: raw applicant records to a fully numeric table

use super::{
    config::{ColumnRole, ColumnTransformerConfig},
    dummies::DummyExpansion,
    encoder::{ColumnEncoder, EncodingStrategy, OrdinalMap, Vocabulary},
};
use crate::error::{PrepError, Result};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Fitted encoder for a column encoded in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FittedEncoder {
    Vocabulary(Vocabulary),
    Ordinal(OrdinalMap),
}

impl FittedEncoder {
    fn as_encoder(&self) -> &dyn ColumnEncoder {
        match self {
            FittedEncoder::Vocabulary(vocab) => vocab,
            FittedEncoder::Ordinal(map) => map,
        }
    }
}

/// What happens to an input column at transform time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ColumnStep {
    Keep,
    Drop,
    Expand,
    Encode(FittedEncoder),
}

fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|column| column.as_materialized_series())
        .map_err(|_| PrepError::FeatureNotFound(name.to_string()))
}

/// Builds per-column encoding state from a record table
#[derive(Debug, Clone, Default)]
pub struct ColumnTransformer {
    config: ColumnTransformerConfig,
}

impl ColumnTransformer {
    /// Create a transformer for the dataset's default column groups
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ColumnTransformerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ColumnTransformerConfig {
        &self.config
    }

    /// Learn vocabularies and indicator layouts from a table.
    ///
    /// The returned state can be applied to other tables, so the codes seen
    /// at inference time match the ones produced for training.
    pub fn fit(&self, df: &DataFrame) -> Result<FittedColumnTransformer> {
        let start = Instant::now();
        self.config.validate()?;

        for name in self.config.required_columns() {
            lookup(df, name)?;
        }

        let steps: Vec<(String, ColumnStep)> = df
            .get_columns()
            .par_iter()
            .map(|column| -> Result<(String, ColumnStep)> {
                let name = column.name().to_string();
                let step = match self.config.role(&name) {
                    ColumnRole::Passthrough => ColumnStep::Keep,
                    ColumnRole::Drop => ColumnStep::Drop,
                    ColumnRole::Dummy => ColumnStep::Expand,
                    ColumnRole::Encode(EncodingStrategy::Vocabulary) => ColumnStep::Encode(
                        FittedEncoder::Vocabulary(Vocabulary::fit(column.as_materialized_series())?),
                    ),
                    ColumnRole::Encode(EncodingStrategy::FixedOrdinal(map)) => {
                        ColumnStep::Encode(FittedEncoder::Ordinal(map))
                    }
                };
                Ok((name, step))
            })
            .collect::<Result<Vec<_>>>()?;

        // indicator columns follow the configured order, not the input order
        let dummies = self
            .config
            .dummy_columns
            .iter()
            .filter(|name| self.config.role(name) == ColumnRole::Dummy)
            .map(|name| DummyExpansion::fit(lookup(df, name)?))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            columns = steps.len(),
            dummies = dummies.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fitted column transformer"
        );

        Ok(FittedColumnTransformer { steps, dummies })
    }

    /// Fit on a table and transform that same table
    pub fn fit_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?.transform(df)
    }
}

/// Column encoding state learned from one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedColumnTransformer {
    steps: Vec<(String, ColumnStep)>,
    dummies: Vec<DummyExpansion>,
}

impl FittedColumnTransformer {
    /// Apply the fitted encodings to a table.
    ///
    /// Every column seen at fit time must be present. Columns that were not
    /// seen at fit time are left out of the output.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let known: HashSet<&str> = self.steps.iter().map(|(name, _)| name.as_str()).collect();
        let extra: Vec<&str> = df
            .get_columns()
            .iter()
            .map(|c| c.name().as_str())
            .filter(|name| !known.contains(name))
            .collect();
        if !extra.is_empty() {
            warn!(columns = ?extra, "ignoring columns not seen at fit time");
        }

        let mut columns: Vec<Column> = self
            .steps
            .par_iter()
            .map(|(name, step)| -> Result<Option<Column>> {
                let series = lookup(df, name)?;
                Ok(match step {
                    ColumnStep::Keep => Some(series.clone().into_column()),
                    ColumnStep::Drop | ColumnStep::Expand => None,
                    ColumnStep::Encode(encoder) => {
                        Some(encoder.as_encoder().encode(series)?.into_column())
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        for dummy in &self.dummies {
            let indicators = dummy.expand(lookup(df, dummy.column())?)?;
            columns.extend(indicators.into_iter().map(IntoColumn::into_column));
        }

        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name().as_str()) {
                return Err(PrepError::DuplicateColumn(column.name().to_string()));
            }
        }

        let result = DataFrame::new(columns)?;
        info!(
            rows = result.height(),
            input_columns = df.width(),
            output_columns = result.width(),
            "column transform complete"
        );
        Ok(result)
    }

    /// Names of the output columns, in order
    pub fn output_columns(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter(|(_, step)| matches!(step, ColumnStep::Keep | ColumnStep::Encode(_)))
            .map(|(name, _)| name.clone())
            .chain(self.dummies.iter().flat_map(|d| d.indicator_names()))
            .collect()
    }

    /// The data-derived vocabulary of a label-encoded column
    pub fn vocabulary(&self, column: &str) -> Option<&Vocabulary> {
        self.steps.iter().find_map(|(name, step)| match step {
            ColumnStep::Encode(FittedEncoder::Vocabulary(vocab)) if name == column => Some(vocab),
            _ => None,
        })
    }

    /// The indicator layout of an expanded column
    pub fn dummies(&self, column: &str) -> Option<&DummyExpansion> {
        self.dummies.iter().find(|d| d.column() == column)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn with_groups(dummies: &[&str], encoded: &[&str], dropped: &[&str]) -> ColumnTransformer {
    ColumnTransformer::with_config(
        ColumnTransformerConfig::new()
            .without_target()
            .with_dummy_columns(dummies)
            .with_encoded_columns(encoded)
            .with_dropped_columns(dropped),
    )
}

/// Process a raw table into a numeric one, leaving the input untouched
pub fn process_native_data(df: &DataFrame) -> Result<DataFrame> {
    process_all_labels(df.clone())
}

/// Apply the dataset's dummy expansion, label encoding and identifier removal
pub fn process_all_labels(df: DataFrame) -> Result<DataFrame> {
    ColumnTransformer::new().fit_transform(&df)
}

/// Replace `columns` with drop-first indicator columns appended at the end
pub fn process_dummies_columns(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    with_groups(columns, &[], &[]).fit_transform(&df)
}

/// Label-encode `columns` in place, each with its own vocabulary
pub fn encode_labels(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    with_groups(&[], columns, &[]).fit_transform(&df)
}

/// Remove `columns`; every one of them must exist
pub fn drop_columns(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    with_groups(&[], &[], columns).fit_transform(&df)
}

fn apply_ordinal(df: &mut DataFrame, map: OrdinalMap) -> Result<Series> {
    let encoded = map.encode(lookup(df, map.column())?)?;
    df.with_column(encoded.clone())?;
    Ok(encoded)
}

/// Map `relevent_experience` through its fixed dictionary, in place
pub fn process_relevent_exp(df: &mut DataFrame) -> Result<Series> {
    apply_ordinal(df, OrdinalMap::relevent_experience())
}

/// Map `enrolled_university` through its fixed dictionary, in place
pub fn process_enrolled_university(df: &mut DataFrame) -> Result<Series> {
    apply_ordinal(df, OrdinalMap::enrolled_university())
}

/// Map `education_level` through its fixed dictionary, in place
pub fn process_education_level(df: &mut DataFrame) -> Result<Series> {
    apply_ordinal(df, OrdinalMap::education_level())
}
