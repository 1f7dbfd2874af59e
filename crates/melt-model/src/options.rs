//! Configuration options for the reshape engine and the quality gate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::DATE_COLUMN;

/// Default number of wide rows per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Earliest plausible observation date for the pandemic datasets.
pub fn default_epoch_lower_bound() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// What to do with a measure header that does not parse as a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateParsePolicy {
    /// Abort with a date-parse error naming every bad header.
    #[default]
    Strict,
    /// Keep the rows with a null date; the quality gate rejects them later.
    Permissive,
}

/// What to do with rows dated before the epoch bound or after today.
///
/// Deliberately has no `Default`: every configuration states its choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Keep the rows; the quality gate fails the run on them.
    Reject,
    /// Remove the rows inside the engine and report how many were dropped.
    Drop,
}

/// Whether negative measure values fail the gate or only warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativePolicy {
    #[default]
    Fail,
    Warn,
}

/// Options controlling the reshape engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Wide rows per chunk. Must be positive.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Maximum number of chunks in flight. 1 runs chunks sequentially.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Handling of measure headers that fail date parsing.
    #[serde(default)]
    pub date_policy: DateParsePolicy,

    /// Handling of rows dated outside the plausible range.
    pub out_of_range: OutOfRangePolicy,

    /// Lower bound of the plausible date range.
    #[serde(default = "default_epoch_lower_bound")]
    pub epoch_lower_bound: NaiveDate,

    /// Upper bound of the plausible date range. `None` means today (UTC) at
    /// the time of the call.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_concurrency() -> usize {
    1
}

impl EngineOptions {
    pub fn new(out_of_range: OutOfRangePolicy) -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: 1,
            date_policy: DateParsePolicy::default(),
            out_of_range,
            epoch_lower_bound: default_epoch_lower_bound(),
            reference_date: None,
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn with_date_policy(mut self, policy: DateParsePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    #[must_use]
    pub fn with_epoch_lower_bound(mut self, date: NaiveDate) -> Self {
        self.epoch_lower_bound = date;
        self
    }

    /// Pin "today" for range handling (tests, reproducible reruns).
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Upper date bound in effect for this call.
    pub fn upper_bound(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}

/// Configuration of the quality gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Name of the date column to check.
    #[serde(default = "default_date_column")]
    pub date_column: String,

    /// Name of the measure value column to check.
    pub value_column: String,

    /// Earliest acceptable date.
    #[serde(default = "default_epoch_lower_bound")]
    pub epoch_lower_bound: NaiveDate,

    /// Negative values: hard failure or warning.
    #[serde(default)]
    pub negative_policy: NegativePolicy,
}

fn default_date_column() -> String {
    DATE_COLUMN.to_string()
}

impl GateConfig {
    pub fn new(value_column: impl Into<String>) -> Self {
        Self {
            date_column: default_date_column(),
            value_column: value_column.into(),
            epoch_lower_bound: default_epoch_lower_bound(),
            negative_policy: NegativePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_negative_policy(mut self, policy: NegativePolicy) -> Self {
        self.negative_policy = policy;
        self
    }

    #[must_use]
    pub fn with_epoch_lower_bound(mut self, date: NaiveDate) -> Self {
        self.epoch_lower_bound = date;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_defaults() {
        let options = EngineOptions::new(OutOfRangePolicy::Reject);
        assert_eq!(options.chunk_size, 100);
        assert_eq!(options.concurrency, 1);
        assert_eq!(options.date_policy, DateParsePolicy::Strict);
        assert_eq!(options.epoch_lower_bound.to_string(), "2020-01-01");
    }

    #[test]
    fn out_of_range_is_required_in_json() {
        let missing = serde_json::from_str::<EngineOptions>(r#"{"chunk_size": 10}"#);
        assert!(missing.is_err());

        let parsed: EngineOptions =
            serde_json::from_str(r#"{"chunk_size": 10, "out_of_range": "drop"}"#).unwrap();
        assert_eq!(parsed.chunk_size, 10);
        assert_eq!(parsed.out_of_range, OutOfRangePolicy::Drop);
        assert_eq!(parsed.concurrency, 1);
    }

    #[test]
    fn reference_date_pins_upper_bound() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 9).unwrap();
        let options = EngineOptions::new(OutOfRangePolicy::Drop).with_reference_date(date);
        assert_eq!(options.upper_bound(), date);
    }

    #[test]
    fn gate_defaults() {
        let config = GateConfig::new("deaths");
        assert_eq!(config.date_column, "date");
        assert_eq!(config.negative_policy, NegativePolicy::Fail);
    }
}
