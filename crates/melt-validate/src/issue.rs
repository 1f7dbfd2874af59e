//! Quality gate issue types.
//!
//! Each variant carries only the data its message needs.

use std::fmt;

use chrono::NaiveDate;
use melt_model::{GateConfig, NegativePolicy};
use serde::{Deserialize, Serialize};

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Fails the gate
    Error,
    /// Recorded on the report, does not fail the gate
    Warning,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// A violated postcondition of a long table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issue {
    // Shape checks
    /// The table has no rows
    EmptyResult,
    /// A required column is absent
    MissingColumn { column: String },
    /// The date column is not a `Date`/`Datetime` dtype
    DateNotTemporal { column: String, dtype: String },
    /// The value column is not numeric
    ValueNotNumeric { column: String, dtype: String },

    // Completeness checks
    NullDates { column: String, null_count: usize },
    NullValues { column: String, null_count: usize },
    DuplicateRows { duplicate_count: usize },
    /// Rows could not be read for the duplicate check
    DuplicateCheckFailed { reason: String },

    // Value checks
    NegativeValues {
        column: String,
        negative_count: usize,
        min_value: String,
    },
    /// Float-typed value column holding non-integral values
    FractionalValues {
        column: String,
        fractional_count: usize,
        samples: Vec<String>,
    },

    // Range checks
    DateBeforeEpoch {
        column: String,
        min_date: NaiveDate,
        bound: NaiveDate,
        row_count: usize,
    },
    FutureDate {
        column: String,
        max_date: NaiveDate,
        today: NaiveDate,
        row_count: usize,
    },
}

impl Issue {
    /// Stable short name of the check that raised this issue.
    pub fn check_name(&self) -> &'static str {
        match self {
            Issue::EmptyResult => "non_empty",
            Issue::MissingColumn { .. } => "required_columns",
            Issue::DateNotTemporal { .. } => "date_dtype",
            Issue::ValueNotNumeric { .. } => "value_dtype",
            Issue::NullDates { .. } => "null_dates",
            Issue::NullValues { .. } => "null_values",
            Issue::DuplicateRows { .. } | Issue::DuplicateCheckFailed { .. } => "duplicates",
            Issue::NegativeValues { .. } => "non_negative",
            Issue::FractionalValues { .. } => "integral_values",
            Issue::DateBeforeEpoch { .. } => "min_date",
            Issue::FutureDate { .. } => "max_date",
        }
    }

    /// Number of offending rows (if applicable).
    pub fn count(&self) -> Option<usize> {
        match self {
            Issue::EmptyResult
            | Issue::MissingColumn { .. }
            | Issue::DateNotTemporal { .. }
            | Issue::ValueNotNumeric { .. }
            | Issue::DuplicateCheckFailed { .. } => None,
            Issue::NullDates { null_count, .. } => Some(*null_count),
            Issue::NullValues { null_count, .. } => Some(*null_count),
            Issue::DuplicateRows { duplicate_count } => Some(*duplicate_count),
            Issue::NegativeValues { negative_count, .. } => Some(*negative_count),
            Issue::FractionalValues {
                fractional_count, ..
            } => Some(*fractional_count),
            Issue::DateBeforeEpoch { row_count, .. } => Some(*row_count),
            Issue::FutureDate { row_count, .. } => Some(*row_count),
        }
    }

    /// Severity under the given gate configuration.
    pub fn severity(&self, config: &GateConfig) -> Severity {
        match self {
            Issue::NegativeValues { .. } if config.negative_policy == NegativePolicy::Warn => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Format message with issue-specific data.
    pub fn message(&self) -> String {
        match self {
            Issue::EmptyResult => "result set is empty".to_string(),
            Issue::MissingColumn { column } => format!("required column {column} is missing"),
            Issue::DateNotTemporal { column, dtype } => {
                format!("column {column} is {dtype}, expected a date type")
            }
            Issue::ValueNotNumeric { column, dtype } => {
                format!("column {column} is {dtype}, expected a numeric type")
            }
            Issue::NullDates { column, null_count } => {
                format!("null dates present ({null_count} rows in {column})")
            }
            Issue::NullValues { column, null_count } => {
                format!("null values present ({null_count} rows in {column})")
            }
            Issue::DuplicateRows { duplicate_count } => {
                format!("duplicate rows present ({duplicate_count} rows)")
            }
            Issue::DuplicateCheckFailed { reason } => {
                format!("duplicate check could not run: {reason}")
            }
            Issue::NegativeValues {
                column,
                negative_count,
                min_value,
            } => format!(
                "negative values present ({negative_count} rows in {column}, min {min_value})"
            ),
            Issue::FractionalValues {
                column,
                fractional_count,
                samples,
            } => {
                let sample_str = if samples.is_empty() {
                    String::new()
                } else {
                    format!(" (e.g., {})", samples.join(", "))
                };
                format!("column {column} has {fractional_count} non-integral values{sample_str}")
            }
            Issue::DateBeforeEpoch {
                column,
                min_date,
                bound,
                row_count,
            } => format!(
                "{row_count} rows in {column} are before {bound} (earliest {min_date})"
            ),
            Issue::FutureDate {
                column,
                max_date,
                today,
                row_count,
            } => format!("{row_count} rows in {column} are after {today} (latest {max_date})"),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_severity_follows_policy() {
        let issue = Issue::NegativeValues {
            column: "value".to_string(),
            negative_count: 1,
            min_value: "-5".to_string(),
        };
        let fail = GateConfig::new("value");
        let warn = GateConfig::new("value").with_negative_policy(NegativePolicy::Warn);
        assert_eq!(issue.severity(&fail), Severity::Error);
        assert_eq!(issue.severity(&warn), Severity::Warning);
        assert_eq!(Issue::EmptyResult.severity(&warn), Severity::Error);
    }

    #[test]
    fn severity_parse_and_label() {
        assert_eq!(Severity::parse(" Warn "), Some(Severity::Warning));
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("fatal"), None);
        assert_eq!(Severity::Warning.label(), "Warning");
    }

    #[test]
    fn messages() {
        insta::assert_snapshot!(
            Issue::NullDates { column: "date".to_string(), null_count: 2 }.to_string(),
            @"null dates present (2 rows in date)"
        );
        insta::assert_snapshot!(
            Issue::FractionalValues {
                column: "deaths".to_string(),
                fractional_count: 2,
                samples: vec!["1.5".to_string(), "2.25".to_string()],
            }
            .to_string(),
            @"column deaths has 2 non-integral values (e.g., 1.5, 2.25)"
        );
    }
}
