//! Plausible date range checks.

use chrono::NaiveDate;
use melt_common::{epoch_days, from_epoch_days};
use melt_model::GateConfig;
use polars::prelude::{Column, DataType};

use super::schema::GateColumns;
use crate::issue::Issue;

/// Minimum and maximum non-null dates of the date column.
pub(crate) fn bounds(columns: &GateColumns<'_>) -> Option<(NaiveDate, NaiveDate)> {
    let days = date_column_days(columns)?;
    let min = days.iter().flatten().min().copied()?;
    let max = days.iter().flatten().max().copied()?;
    Some((from_epoch_days(min)?, from_epoch_days(max)?))
}

pub(crate) fn check(columns: &GateColumns<'_>, config: &GateConfig, today: NaiveDate) -> Vec<Issue> {
    let Some(days) = date_column_days(columns) else {
        return vec![];
    };
    let Some((min_date, max_date)) = bounds(columns) else {
        return vec![];
    };

    let mut issues = Vec::new();
    if min_date < config.epoch_lower_bound {
        let bound = epoch_days(config.epoch_lower_bound);
        issues.push(Issue::DateBeforeEpoch {
            column: config.date_column.clone(),
            min_date,
            bound: config.epoch_lower_bound,
            row_count: days.iter().flatten().filter(|day| **day < bound).count(),
        });
    }
    if max_date > today {
        let limit = epoch_days(today);
        issues.push(Issue::FutureDate {
            column: config.date_column.clone(),
            max_date,
            today,
            row_count: days.iter().flatten().filter(|day| **day > limit).count(),
        });
    }
    issues
}

fn date_column_days(columns: &GateColumns<'_>) -> Option<Vec<Option<i32>>> {
    let column: &Column = columns.date.filter(|_| columns.date_temporal)?;
    let days = column
        .cast(&DataType::Date)
        .and_then(|dates| dates.cast(&DataType::Int32))
        .ok()?;
    let days = days.as_materialized_series().i32().ok()?;
    Some(days.into_iter().collect())
}
