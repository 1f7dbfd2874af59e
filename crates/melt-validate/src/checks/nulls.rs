//! Null checks for the date and value columns.

use melt_model::GateConfig;

use super::schema::GateColumns;
use crate::issue::Issue;

pub(crate) fn check(columns: &GateColumns<'_>, config: &GateConfig) -> Vec<Issue> {
    let mut issues = Vec::new();
    if let Some(date) = columns.date {
        let null_count = date.null_count();
        if null_count > 0 {
            issues.push(Issue::NullDates {
                column: config.date_column.clone(),
                null_count,
            });
        }
    }
    if let Some(value) = columns.value {
        let null_count = value.null_count();
        if null_count > 0 {
            issues.push(Issue::NullValues {
                column: config.value_column.clone(),
                null_count,
            });
        }
    }
    issues
}
