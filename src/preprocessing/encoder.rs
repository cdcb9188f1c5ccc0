//! Column encoders
//!
//! Two independent strategies turn category values into integer codes:
//! - [`Vocabulary`]: codes assigned from the sorted distinct values observed in the data
//! - [`OrdinalMap`]: codes read from a fixed, domain-ordered dictionary
//!
//! Both implement [`ColumnEncoder`], so the column transformer can hold either
//! one per column without knowing which strategy the caller picked.

use crate::error::{PrepError, Result};
use crate::schema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// A fitted, per-column value encoder
pub trait ColumnEncoder: Send + Sync {
    /// Name of the column this encoder was built for
    fn column(&self) -> &str;

    /// Encode a series into integer codes, keeping the series name
    fn encode(&self, series: &Series) -> Result<Series>;
}

/// Which encoding strategy a column uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncodingStrategy {
    /// Codes built from the distinct values present in the data
    Vocabulary,
    /// Codes from a fixed dictionary
    FixedOrdinal(OrdinalMap),
}

/// Sorted distinct values of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Categories {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Categories {
    pub fn len(&self) -> usize {
        match self {
            Categories::Numeric(values) => values.len(),
            Categories::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn is_text(series: &Series) -> bool {
    matches!(series.dtype(), DataType::String)
}

/// Collect a column as `f64`, refusing nulls and NaN
pub(crate) fn numeric_values(series: &Series) -> Result<Vec<f64>> {
    let casted = series.cast(&DataType::Float64)?;
    casted
        .f64()?
        .into_iter()
        .map(|opt| match opt {
            Some(v) if !v.is_nan() => Ok(v),
            _ => Err(PrepError::MissingValue {
                column: series.name().to_string(),
            }),
        })
        .collect()
}

/// Collect a string column, nulls as `None`
fn optional_text(series: &Series) -> Result<Vec<Option<&str>>> {
    Ok(series.str()?.into_iter().collect())
}

/// Collect a numeric column as `f64`, nulls and NaN as `None`
fn optional_numeric(series: &Series) -> Result<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .into_iter()
        .map(|opt| opt.filter(|v| !v.is_nan()))
        .collect();
    Ok(values)
}

fn cmp_f64(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Data-derived label encoding: the i-th smallest distinct value gets code i.
///
/// Numeric columns sort numerically, string columns lexicographically.
/// A missing value counts as one more category, placed after all the
/// others, so it takes the last code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    column: String,
    categories: Categories,
    #[serde(default)]
    has_missing: bool,
}

impl Vocabulary {
    /// Build the vocabulary of a column from the values it contains
    pub fn fit(series: &Series) -> Result<Self> {
        let (categories, has_missing) = if is_text(series) {
            let values = optional_text(series)?;
            let has_missing = values.iter().any(Option::is_none);
            let distinct: BTreeSet<&str> = values.into_iter().flatten().collect();
            (
                Categories::Text(distinct.into_iter().map(str::to_string).collect()),
                has_missing,
            )
        } else {
            let values = optional_numeric(series)?;
            let has_missing = values.iter().any(Option::is_none);
            let mut present: Vec<f64> = values.into_iter().flatten().collect();
            present.sort_by(cmp_f64);
            present.dedup();
            (Categories::Numeric(present), has_missing)
        };

        debug!(
            column = %series.name(),
            size = categories.len(),
            has_missing,
            "fitted vocabulary"
        );

        Ok(Self {
            column: series.name().to_string(),
            categories,
            has_missing,
        })
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// Whether missing values were seen at fit time
    pub fn has_missing(&self) -> bool {
        self.has_missing
    }

    /// Number of codes, counting the missing-value category
    pub fn len(&self) -> usize {
        self.categories.len() + usize::from(self.has_missing)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Code given to a missing value, if one was seen at fit time
    pub fn missing_code(&self) -> Option<u32> {
        self.has_missing.then(|| self.categories.len() as u32)
    }

    fn unseen(&self, value: String) -> PrepError {
        PrepError::UnseenCategory {
            column: self.column.clone(),
            value,
        }
    }

    fn code_missing(&self) -> Result<u32> {
        self.missing_code()
            .ok_or_else(|| self.unseen("null".to_string()))
    }
}

impl ColumnEncoder for Vocabulary {
    fn column(&self) -> &str {
        &self.column
    }

    fn encode(&self, series: &Series) -> Result<Series> {
        let codes: Vec<u32> = match &self.categories {
            Categories::Text(known) => {
                if !is_text(series) {
                    return Err(PrepError::DataError(format!(
                        "column '{}' was fitted on strings but has dtype {}",
                        self.column,
                        series.dtype()
                    )));
                }
                optional_text(series)?
                    .into_iter()
                    .map(|opt| match opt {
                        None => self.code_missing(),
                        Some(v) => known
                            .binary_search_by(|c| c.as_str().cmp(v))
                            .map(|idx| idx as u32)
                            .map_err(|_| self.unseen(v.to_string())),
                    })
                    .collect::<Result<_>>()?
            }
            Categories::Numeric(known) => optional_numeric(series)?
                .into_iter()
                .map(|opt| match opt {
                    None => self.code_missing(),
                    Some(v) => known
                        .binary_search_by(|c| cmp_f64(c, &v))
                        .map(|idx| idx as u32)
                        .map_err(|_| self.unseen(v.to_string())),
                })
                .collect::<Result<_>>()?,
        };

        Ok(Series::new(series.name().clone(), codes))
    }
}

/// Fixed dictionary encoding for ordinal columns.
///
/// Values missing from the dictionary, and nulls, come out as nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalMap {
    column: String,
    mapping: BTreeMap<String, u32>,
}

impl OrdinalMap {
    pub fn new<I, S>(column: impl Into<String>, mapping: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            mapping: mapping.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn relevent_experience() -> Self {
        Self::new(
            schema::RELEVENT_EXPERIENCE,
            [("No relevent experience", 0), ("Has relevent experience", 1)],
        )
    }

    pub fn enrolled_university() -> Self {
        Self::new(
            schema::ENROLLED_UNIVERSITY,
            [
                ("None", 0),
                ("no_enrollment", 1),
                ("Part time course", 2),
                ("Full time course", 3),
            ],
        )
    }

    pub fn education_level() -> Self {
        Self::new(
            schema::EDUCATION_LEVEL,
            [
                ("None", 0),
                ("Primary School", 1),
                ("High School", 2),
                ("Masters", 3),
                ("Graduate", 4),
                ("Phd", 5),
            ],
        )
    }

    /// The built-in dictionary for a column, if one exists
    pub fn for_column(column: &str) -> Option<Self> {
        match column {
            schema::RELEVENT_EXPERIENCE => Some(Self::relevent_experience()),
            schema::ENROLLED_UNIVERSITY => Some(Self::enrolled_university()),
            schema::EDUCATION_LEVEL => Some(Self::education_level()),
            _ => None,
        }
    }

    pub fn get(&self, value: &str) -> Option<u32> {
        self.mapping.get(value).copied()
    }
}

impl ColumnEncoder for OrdinalMap {
    fn column(&self) -> &str {
        &self.column
    }

    fn encode(&self, series: &Series) -> Result<Series> {
        let strings = series.cast(&DataType::String)?;
        let mut unmapped = 0usize;
        let codes: Vec<Option<u32>> = strings
            .str()?
            .into_iter()
            .map(|opt| {
                let code = opt.and_then(|v| self.get(v));
                if opt.is_some() && code.is_none() {
                    unmapped += 1;
                }
                code
            })
            .collect();

        if unmapped > 0 {
            warn!(
                column = %self.column,
                unmapped,
                "values outside the ordinal dictionary were left as nulls"
            );
        }

        Ok(Series::new(series.name().clone(), codes))
    }
}
