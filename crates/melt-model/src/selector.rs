//! Measure-column selection.
//!
//! A wide table's columns split into identifiers (kept) and measures
//! (unpivoted). Which columns are measures is a per-dataset predicate over
//! the column name. [`MeasureSelector`] is the serializable form used in
//! dataset configs; any `Fn(&str) -> bool` also works as a selector.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Predicate deciding whether a source column is a measure column.
pub trait ColumnSelector {
    fn is_measure(&self, column: &str) -> bool;
}

impl<F> ColumnSelector for F
where
    F: Fn(&str) -> bool,
{
    fn is_measure(&self, column: &str) -> bool {
        self(column)
    }
}

/// Serializable measure-column predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MeasureSelector {
    /// Column name contains at least one of these characters.
    ContainsAny(String),
    /// Column name matches this regular expression.
    Regex(String),
    /// Column name is one of these names exactly.
    Explicit(Vec<String>),
}

impl MeasureSelector {
    /// The reference rule: a header holding a date separator is a date column.
    pub fn date_separator() -> Self {
        Self::ContainsAny("/".to_string())
    }

    /// Compile into a matcher. Fails only for an invalid regex.
    pub fn compile(&self) -> Result<CompiledSelector> {
        Ok(match self {
            Self::ContainsAny(chars) => CompiledSelector::ContainsAny(chars.chars().collect()),
            Self::Regex(pattern) => {
                let regex = Regex::new(pattern).map_err(|source| ModelError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                CompiledSelector::Regex(regex)
            }
            Self::Explicit(names) => CompiledSelector::Explicit(names.iter().cloned().collect()),
        })
    }
}

impl Default for MeasureSelector {
    fn default() -> Self {
        Self::date_separator()
    }
}

/// A [`MeasureSelector`] ready for matching.
#[derive(Debug, Clone)]
pub enum CompiledSelector {
    ContainsAny(Vec<char>),
    Regex(Regex),
    Explicit(BTreeSet<String>),
}

impl ColumnSelector for CompiledSelector {
    fn is_measure(&self, column: &str) -> bool {
        match self {
            Self::ContainsAny(chars) => column.chars().any(|ch| chars.contains(&ch)),
            Self::Regex(regex) => regex.is_match(column),
            Self::Explicit(names) => names.contains(column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_separator_matches_slash_headers() {
        let selector = MeasureSelector::date_separator().compile().unwrap();
        assert!(selector.is_measure("1/22/20"));
        assert!(!selector.is_measure("Country_Region"));
    }

    #[test]
    fn regex_selector() {
        let selector = MeasureSelector::Regex(r"^\d{4}-\d{2}-\d{2}$".to_string())
            .compile()
            .unwrap();
        assert!(selector.is_measure("2020-01-22"));
        assert!(!selector.is_measure("Lat"));
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = MeasureSelector::Regex("(".to_string()).compile().unwrap_err();
        assert!(matches!(err, ModelError::InvalidPattern { .. }));
    }

    #[test]
    fn explicit_selector() {
        let selector = MeasureSelector::Explicit(vec!["d1".into(), "d2".into()])
            .compile()
            .unwrap();
        assert!(selector.is_measure("d2"));
        assert!(!selector.is_measure("d3"));
    }

    #[test]
    fn closures_are_selectors() {
        let selector = |name: &str| name.starts_with("day_");
        assert!(selector.is_measure("day_1"));
        assert!(!selector.is_measure("region"));
    }

    #[test]
    fn selector_json_shape() {
        let json = serde_json::to_string(&MeasureSelector::date_separator()).unwrap();
        assert_eq!(json, r#"{"kind":"contains_any","value":"/"}"#);
    }
}
