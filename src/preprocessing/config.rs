//! Column transformer configuration

use super::encoder::{ColumnEncoder, EncodingStrategy, OrdinalMap};
use crate::error::{PrepError, Result};
use crate::schema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// What the transformer does with one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnRole {
    /// Expanded into indicator columns
    Dummy,
    /// Replaced in place by integer codes
    Encode(EncodingStrategy),
    /// Removed
    Drop,
    /// Left untouched
    Passthrough,
}

/// Configuration for the column transformer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformerConfig {
    /// Nominal columns expanded into drop-first indicator columns
    pub dummy_columns: Vec<String>,

    /// Columns label-encoded in place
    pub encoded_columns: Vec<String>,

    /// Columns removed from the output
    pub dropped_columns: Vec<String>,

    /// Label column, passed through unchanged. `None` leaves every column
    /// open to the groups above.
    pub target_column: Option<String>,

    /// Explicit encoding choices. A column listed here is encoded in place
    /// with the given strategy, even if it also appears in `dummy_columns`.
    pub overrides: BTreeMap<String, EncodingStrategy>,
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

impl Default for ColumnTransformerConfig {
    fn default() -> Self {
        Self {
            dummy_columns: owned(&schema::DUMMY_COLUMNS),
            encoded_columns: owned(&schema::ENCODED_COLUMNS),
            dropped_columns: owned(&schema::DROPPED_COLUMNS),
            target_column: Some(schema::TARGET.to_string()),
            overrides: BTreeMap::new(),
        }
    }
}

impl ColumnTransformerConfig {
    /// Create a new configuration with the dataset's column groups
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dummy_columns(mut self, columns: &[&str]) -> Self {
        self.dummy_columns = owned(columns);
        self
    }

    pub fn with_encoded_columns(mut self, columns: &[&str]) -> Self {
        self.encoded_columns = owned(columns);
        self
    }

    pub fn with_dropped_columns(mut self, columns: &[&str]) -> Self {
        self.dropped_columns = owned(columns);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = Some(target.into());
        self
    }

    /// Treat no column as the label
    pub fn without_target(mut self) -> Self {
        self.target_column = None;
        self
    }

    /// Pick the encoding strategy of a column explicitly
    pub fn with_strategy(mut self, column: impl Into<String>, strategy: EncodingStrategy) -> Self {
        self.overrides.insert(column.into(), strategy);
        self
    }

    /// Encode a column through a fixed ordinal dictionary
    pub fn with_ordinal(self, map: OrdinalMap) -> Self {
        let column = map.column().to_string();
        self.with_strategy(column, EncodingStrategy::FixedOrdinal(map))
    }

    /// Use the built-in ordinal dictionaries for every column that has one
    pub fn with_builtin_ordinals(self) -> Self {
        [
            OrdinalMap::relevent_experience(),
            OrdinalMap::enrolled_university(),
            OrdinalMap::education_level(),
        ]
        .into_iter()
        .fold(self, |config, map| config.with_ordinal(map))
    }

    /// Resolve the role of a column
    pub fn role(&self, column: &str) -> ColumnRole {
        if self.target_column.as_deref() == Some(column) {
            return ColumnRole::Passthrough;
        }
        if let Some(strategy) = self.overrides.get(column) {
            return ColumnRole::Encode(strategy.clone());
        }
        if self.dropped_columns.iter().any(|c| c == column) {
            ColumnRole::Drop
        } else if self.dummy_columns.iter().any(|c| c == column) {
            ColumnRole::Dummy
        } else if self.encoded_columns.iter().any(|c| c == column) {
            ColumnRole::Encode(EncodingStrategy::Vocabulary)
        } else {
            ColumnRole::Passthrough
        }
    }

    /// Every column the transformer needs to find in its input
    pub fn required_columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.dummy_columns
            .iter()
            .chain(self.encoded_columns.iter())
            .chain(self.dropped_columns.iter())
            .chain(self.overrides.keys())
            .map(String::as_str)
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Reject overlapping column groups and a label column inside any group
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in self
            .dummy_columns
            .iter()
            .chain(self.encoded_columns.iter())
            .chain(self.dropped_columns.iter())
        {
            if !seen.insert(column.as_str()) {
                return Err(PrepError::InvalidParameter {
                    name: "columns".to_string(),
                    value: column.clone(),
                    reason: "listed in more than one column group".to_string(),
                });
            }
        }

        if let Some(target) = &self.target_column {
            if seen.contains(target.as_str()) || self.overrides.contains_key(target) {
                return Err(PrepError::InvalidParameter {
                    name: "target_column".to_string(),
                    value: target.clone(),
                    reason: "label column cannot be transformed".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ColumnTransformerConfig::default();
        assert_eq!(config.dummy_columns.len(), 5);
        assert_eq!(config.encoded_columns.len(), 7);
        assert_eq!(config.target_column.as_deref(), Some("target"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_roles() {
        let config = ColumnTransformerConfig::default();
        assert_eq!(config.role("gender"), ColumnRole::Dummy);
        assert_eq!(config.role("city"), ColumnRole::Encode(EncodingStrategy::Vocabulary));
        assert_eq!(config.role("enrollee_id"), ColumnRole::Drop);
        assert_eq!(config.role("target"), ColumnRole::Passthrough);
        assert_eq!(config.role("unrelated"), ColumnRole::Passthrough);
    }

    #[test]
    fn test_ordinal_override_beats_dummy_group() {
        let config = ColumnTransformerConfig::new().with_builtin_ordinals();
        assert!(matches!(
            config.role("relevent_experience"),
            ColumnRole::Encode(EncodingStrategy::FixedOrdinal(_))
        ));
        assert!(matches!(
            config.role("education_level"),
            ColumnRole::Encode(EncodingStrategy::FixedOrdinal(_))
        ));
        assert_eq!(config.required_columns().len(), 13);
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let config = ColumnTransformerConfig::new().with_encoded_columns(&["gender"]);
        assert!(config.validate().is_err());

        let config = ColumnTransformerConfig::new().with_dropped_columns(&["target"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_without_target_allows_any_group() {
        let config = ColumnTransformerConfig::new()
            .without_target()
            .with_dropped_columns(&["target"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.role("target"), ColumnRole::Drop);
    }

    #[test]
    fn test_config_serialize() {
        let config = ColumnTransformerConfig::new().with_builtin_ordinals();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ColumnTransformerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
