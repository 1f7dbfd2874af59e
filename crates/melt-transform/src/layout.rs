//! Resolution of a wide table's columns into identifiers and measures.
//!
//! Everything that is the same for every chunk is worked out once here:
//! which source columns are identifiers, which are measures, their canonical
//! output names, declared types, and the parsed date of every measure header.

use std::collections::{BTreeMap, HashSet};

use melt_common::epoch_days;
use melt_model::{ColumnSelector, ColumnType, DATE_COLUMN, DatasetSpec, EngineOptions, OutOfRangePolicy};
use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::dates::parse_date_axis;
use crate::error::{Result, TransformError};
use crate::naming::standardize_column_name;

/// An identifier column as it appears in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IdentifierColumn {
    pub source: String,
    pub canonical: String,
    pub target: Option<ColumnType>,
}

/// A measure column that survives range handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MeasureColumn {
    pub source: String,
    /// Days since the Unix epoch; `None` when the header did not parse.
    pub epoch_day: Option<i32>,
}

/// Column layout shared by every chunk of one standardize call.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub identifiers: Vec<IdentifierColumn>,
    pub measures: Vec<MeasureColumn>,
    pub value_column: String,
    /// Measure columns matched by the selector, before range handling.
    pub matched_measures: usize,
    /// Measure columns removed under [`OutOfRangePolicy::Drop`].
    pub dropped_measures: usize,
    pub ignored: Vec<String>,
    pub unparsed_headers: Vec<String>,
}

impl Layout {
    pub fn resolve(
        wide: &DataFrame,
        spec: &DatasetSpec,
        selector: &dyn ColumnSelector,
        options: &EngineOptions,
    ) -> Result<Self> {
        let present: HashSet<&str> = wide
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        let missing: Vec<String> = spec
            .identifier_columns
            .iter()
            .filter(|name| !present.contains(name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(TransformError::MissingIdentifiers {
                dataset: spec.name.clone(),
                missing,
            });
        }

        let identifier_set: HashSet<&str> =
            spec.identifier_columns.iter().map(String::as_str).collect();
        let mut headers = Vec::new();
        let mut ignored = Vec::new();
        for name in wide.get_column_names() {
            let name = name.as_str();
            if identifier_set.contains(name) {
                continue;
            }
            if selector.is_measure(name) {
                headers.push(name.to_string());
            } else {
                ignored.push(name.to_string());
            }
        }
        if headers.is_empty() {
            return Err(TransformError::NoMeasureColumns {
                dataset: spec.name.clone(),
                column_count: wide.width(),
            });
        }
        if !ignored.is_empty() {
            debug!(columns = ?ignored, "ignoring columns that are neither identifiers nor measures");
        }

        let identifiers = canonical_identifiers(spec)?;
        let value_column = canonical_value_column(spec, &identifiers)?;

        let axis = parse_date_axis(&headers, &spec.date_format, options.date_policy)?;
        let matched_measures = headers.len();
        let mut measures: Vec<MeasureColumn> = headers
            .into_iter()
            .zip(axis.dates)
            .map(|(source, date)| MeasureColumn {
                source,
                epoch_day: date.map(epoch_days),
            })
            .collect();

        let mut dropped_measures = 0;
        if options.out_of_range == OutOfRangePolicy::Drop {
            let lower = epoch_days(options.epoch_lower_bound);
            let upper = epoch_days(options.upper_bound());
            let before = measures.len();
            measures.retain(|measure| match measure.epoch_day {
                Some(day) => (lower..=upper).contains(&day),
                None => true,
            });
            dropped_measures = before - measures.len();
            if dropped_measures > 0 {
                info!(
                    dataset = %spec.name,
                    columns = dropped_measures,
                    lower = %options.epoch_lower_bound,
                    upper = %options.upper_bound(),
                    "dropping measure columns dated outside the plausible range"
                );
            }
        }

        Ok(Self {
            identifiers,
            measures,
            value_column,
            matched_measures,
            dropped_measures,
            ignored,
            unparsed_headers: axis.unparsed,
        })
    }
}

fn canonical_identifiers(spec: &DatasetSpec) -> Result<Vec<IdentifierColumn>> {
    let mut identifiers = Vec::with_capacity(spec.identifier_columns.len());
    for source in &spec.identifier_columns {
        let canonical = standardize_column_name(source);
        if canonical.is_empty() {
            return Err(TransformError::EmptyColumnName(source.clone()));
        }
        let target = spec.column_type(&canonical);
        if target.is_none() {
            debug!(column = %canonical, "no declared type; keeping source dtype");
        }
        identifiers.push(IdentifierColumn {
            source: source.clone(),
            canonical,
            target,
        });
    }
    Ok(identifiers)
}

/// Standardize the value column name and reject any output name collision.
fn canonical_value_column(spec: &DatasetSpec, identifiers: &[IdentifierColumn]) -> Result<String> {
    let value_column = standardize_column_name(&spec.value_name);
    if value_column.is_empty() {
        return Err(TransformError::EmptyColumnName(spec.value_name.clone()));
    }

    let mut sources: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for identifier in identifiers {
        sources
            .entry(identifier.canonical.as_str())
            .or_default()
            .push(identifier.source.clone());
    }
    sources
        .entry(DATE_COLUMN)
        .or_default()
        .push(DATE_COLUMN.to_string());
    sources
        .entry(value_column.as_str())
        .or_default()
        .push(spec.value_name.clone());

    if let Some((canonical, names)) = sources.into_iter().find(|(_, names)| names.len() > 1) {
        return Err(TransformError::DuplicateColumnName {
            canonical: canonical.to_string(),
            sources: names,
        });
    }
    Ok(value_column)
}
