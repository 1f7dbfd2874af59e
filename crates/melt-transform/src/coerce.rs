//! Type coercion of chunk columns to their declared semantic types.
//!
//! Coercion never fills nulls: an empty source cell stays null, and any
//! non-null cell that cannot be represented in the target type fails the
//! whole chunk with the column name and a sample of the offending values.

use melt_common::{any_to_f64, any_to_integral_i64, any_to_string};
use melt_model::ColumnType;
use polars::prelude::{AnyValue, Column, DataType, NamedFrom, Series};

use crate::error::{Result, TransformError};

const MAX_SAMPLES: usize = 5;

/// Collects conversion failures for one column.
#[derive(Debug, Default)]
struct Failures {
    count: usize,
    samples: Vec<String>,
    source_column: Option<String>,
}

impl Failures {
    fn record(&mut self, value: AnyValue<'_>, source_column: Option<&str>) {
        self.count += 1;
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(any_to_string(value));
        }
        if self.source_column.is_none() {
            self.source_column = source_column.map(str::to_string);
        }
    }

    fn into_result(
        self,
        chunk: usize,
        column: &str,
        target: ColumnType,
    ) -> Result<()> {
        if self.count == 0 {
            return Ok(());
        }
        Err(TransformError::TypeCoercion {
            chunk,
            column: column.to_string(),
            source_column: self.source_column,
            target,
            failed_count: self.count,
            samples: self.samples,
        })
    }
}

/// Coerce one identifier column of a chunk and rename it to `canonical`.
///
/// Columns without a declared type keep their source dtype.
pub fn coerce_identifier(
    column: &Column,
    canonical: &str,
    target: Option<ColumnType>,
    chunk: usize,
) -> Result<Series> {
    let Some(target) = target else {
        return Ok(column
            .as_materialized_series()
            .clone()
            .with_name(canonical.into()));
    };
    let mut failures = Failures::default();
    let series = match target {
        ColumnType::Text => {
            let mut values: Vec<Option<String>> = Vec::with_capacity(column.len());
            for idx in 0..column.len() {
                match column.get(idx)? {
                    AnyValue::Null => values.push(None),
                    value => values.push(Some(any_to_string(value))),
                }
            }
            Series::new(canonical.into(), values)
        }
        ColumnType::Integer => {
            let mut values: Vec<Option<i64>> = Vec::with_capacity(column.len());
            for idx in 0..column.len() {
                match column.get(idx)? {
                    AnyValue::Null => values.push(None),
                    value => match any_to_integral_i64(value.clone()) {
                        Some(v) => values.push(Some(v)),
                        None => {
                            failures.record(value, None);
                            values.push(None);
                        }
                    },
                }
            }
            Series::new(canonical.into(), values)
        }
        ColumnType::Float => {
            let mut values: Vec<Option<f64>> = Vec::with_capacity(column.len());
            for idx in 0..column.len() {
                match column.get(idx)? {
                    AnyValue::Null => values.push(None),
                    value => match any_to_f64(value.clone()) {
                        Some(v) => values.push(Some(v)),
                        None => {
                            failures.record(value, None);
                            values.push(None);
                        }
                    },
                }
            }
            Series::new(canonical.into(), values)
        }
    };
    failures.into_result(chunk, canonical, target)?;
    Ok(series)
}

/// Convert the measure cells of a chunk to integral counts, row-major.
///
/// The output holds `rows * measures.len()` values: for each source row, one
/// value per measure column in column order.
pub fn coerce_measure_values(
    measures: &[(&str, &Column)],
    rows: usize,
    value_column: &str,
    chunk: usize,
) -> Result<Vec<Option<i64>>> {
    let mut per_column: Vec<Vec<Option<i64>>> = Vec::with_capacity(measures.len());
    let mut failures = Failures::default();
    for (header, column) in measures {
        per_column.push(integral_cells(column, rows, header, &mut failures)?);
    }
    failures.into_result(chunk, value_column, ColumnType::Integer)?;

    let mut values = Vec::with_capacity(rows * measures.len());
    for row in 0..rows {
        for cells in &per_column {
            values.push(cells[row]);
        }
    }
    Ok(values)
}

fn integral_cells(
    column: &Column,
    rows: usize,
    header: &str,
    failures: &mut Failures,
) -> Result<Vec<Option<i64>>> {
    if column.dtype() == &DataType::Int64 {
        return Ok(column.as_materialized_series().i64()?.into_iter().collect());
    }
    let mut cells = Vec::with_capacity(rows);
    for idx in 0..rows {
        match column.get(idx)? {
            AnyValue::Null => cells.push(None),
            value => match any_to_integral_i64(value.clone()) {
                Some(v) => cells.push(Some(v)),
                None => {
                    failures.record(value, Some(header));
                    cells.push(None);
                }
            },
        }
    }
    Ok(cells)
}
