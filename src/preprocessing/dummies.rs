//! One-hot (dummy) expansion with the first category dropped

use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fitted indicator layout for one nominal column.
///
/// Distinct non-null values are sorted; the first becomes the reference
/// category and gets no indicator. A column with a single distinct value
/// therefore expands to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DummyExpansion {
    column: String,
    reference: Option<String>,
    categories: Vec<String>,
}

impl DummyExpansion {
    /// Learn the category set of a column
    pub fn fit(series: &Series) -> Result<Self> {
        let strings = series.cast(&DataType::String)?;
        let distinct: BTreeSet<&str> = strings.str()?.into_iter().flatten().collect();

        let mut iter = distinct.into_iter().map(str::to_string);
        let reference = iter.next();
        let categories = iter.collect();

        Ok(Self {
            column: series.name().to_string(),
            reference,
            categories,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// The dropped reference category
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Categories that receive an indicator column, in output order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Names of the generated indicator columns
    pub fn indicator_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| format!("{}_{}", self.column, category))
            .collect()
    }

    /// Build the 0/1 indicator columns for a series.
    ///
    /// Nulls produce all-zero rows. Values not seen at fit time are rejected.
    pub fn expand(&self, series: &Series) -> Result<Vec<Series>> {
        let strings = series.cast(&DataType::String)?;
        let positions: Vec<Option<usize>> = strings
            .str()?
            .into_iter()
            .map(|opt| match opt {
                None => Ok(None),
                Some(v) if self.reference.as_deref() == Some(v) => Ok(None),
                Some(v) => match self.categories.binary_search_by(|c| c.as_str().cmp(v)) {
                    Ok(idx) => Ok(Some(idx)),
                    Err(_) => Err(PrepError::UnseenCategory {
                        column: self.column.clone(),
                        value: v.to_string(),
                    }),
                },
            })
            .collect::<Result<_>>()?;

        let indicators = self
            .indicator_names()
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<u8> = positions
                    .iter()
                    .map(|pos| u8::from(*pos == Some(idx)))
                    .collect();
                Series::new(name.into(), values)
            })
            .collect();

        Ok(indicators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_first_category() {
        let s = Series::new("gender".into(), &["Male", "Female", "Other", "Male"]);
        let dummies = DummyExpansion::fit(&s).unwrap();

        assert_eq!(dummies.reference(), Some("Female"));
        assert_eq!(dummies.indicator_names(), vec!["gender_Male", "gender_Other"]);

        let expanded = dummies.expand(&s).unwrap();
        assert_eq!(expanded.len(), 2);
        let male: Vec<Option<u8>> = expanded[0].u8().unwrap().into_iter().collect();
        assert_eq!(male, vec![Some(1), Some(0), Some(0), Some(1)]);
        let other: Vec<Option<u8>> = expanded[1].u8().unwrap().into_iter().collect();
        assert_eq!(other, vec![Some(0), Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_single_value_yields_no_indicators() {
        let s = Series::new("relevent_experience".into(), &["Has relevent experience"; 3]);
        let dummies = DummyExpansion::fit(&s).unwrap();
        assert!(dummies.indicator_names().is_empty());
        assert!(dummies.expand(&s).unwrap().is_empty());
    }

    #[test]
    fn test_nulls_are_all_zero() {
        let s = Series::new("major_discipline".into(), &[Some("STEM"), None, Some("Arts")]);
        let dummies = DummyExpansion::fit(&s).unwrap();
        let expanded = dummies.expand(&s).unwrap();
        assert_eq!(expanded.len(), 1);
        let stem: Vec<Option<u8>> = expanded[0].u8().unwrap().into_iter().collect();
        assert_eq!(stem, vec![Some(1), Some(0), Some(0)]);
    }

    #[test]
    fn test_unseen_value_rejected() {
        let train = Series::new("company_size".into(), &["10/49", "<10"]);
        let dummies = DummyExpansion::fit(&train).unwrap();
        let other = Series::new("company_size".into(), &["10000+"]);
        assert!(matches!(
            dummies.expand(&other),
            Err(PrepError::UnseenCategory { .. })
        ));
    }
}
