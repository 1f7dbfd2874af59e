//! The quality gate: every check, one verdict.

use std::time::Instant;

use chrono::NaiveDate;
use melt_model::GateConfig;
use polars::prelude::DataFrame;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use crate::checks;
use crate::issue::{Issue, Severity};

/// Summary of an accepted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateReport {
    pub rows: usize,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// Issues that did not fail the gate.
    pub warnings: Vec<Issue>,
}

/// The table violated at least one error-severity check.
#[derive(Debug, Clone, Error)]
#[error("quality gate failed: {}", render(checks_failed))]
pub struct ValidationFailure {
    pub checks_failed: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

fn render(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(Issue::message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run every check against `df`, with today's UTC date as the upper bound.
pub fn validate(df: &DataFrame, config: &GateConfig) -> Result<GateReport, ValidationFailure> {
    validate_at(df, config, chrono::Utc::now().date_naive())
}

/// Run every check against `df` with an explicit "today".
///
/// No check short-circuits another: a failure lists every violated check.
pub fn validate_at(
    df: &DataFrame,
    config: &GateConfig,
    today: NaiveDate,
) -> Result<GateReport, ValidationFailure> {
    let span = info_span!("validate", value_column = %config.value_column);
    let _guard = span.enter();
    let start = Instant::now();

    let (mut issues, columns) = checks::schema::check(df, config);
    issues.extend(checks::nulls::check(&columns, config));
    issues.extend(checks::duplicates::check(df));
    issues.extend(checks::values::check(&columns, config));
    issues.extend(checks::dates::check(&columns, config, today));

    let (checks_failed, warnings): (Vec<Issue>, Vec<Issue>) = issues
        .into_iter()
        .partition(|issue| issue.severity(config) == Severity::Error);

    for issue in &warnings {
        warn!(check = issue.check_name(), "{}", issue.message());
    }
    for issue in &checks_failed {
        debug!(check = issue.check_name(), "{}", issue.message());
    }

    if !checks_failed.is_empty() {
        info!(
            failed = checks_failed.len(),
            warnings = warnings.len(),
            duration_ms = start.elapsed().as_millis(),
            "quality gate rejected table"
        );
        return Err(ValidationFailure {
            checks_failed,
            warnings,
        });
    }

    let bounds = checks::dates::bounds(&columns);
    let report = GateReport {
        rows: df.height(),
        min_date: bounds.map(|(min, _)| min),
        max_date: bounds.map(|(_, max)| max),
        warnings,
    };
    info!(
        rows = report.rows,
        warnings = report.warnings.len(),
        duration_ms = start.elapsed().as_millis(),
        "quality gate accepted table"
    );
    Ok(report)
}
