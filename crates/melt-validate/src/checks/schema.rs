//! Shape and dtype checks.

use melt_model::GateConfig;
use polars::prelude::{Column, DataFrame, DataType};

use crate::issue::Issue;

/// The gate's view of the two columns it checks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GateColumns<'a> {
    pub date: Option<&'a Column>,
    /// Date column exists and has a `Date`/`Datetime` dtype.
    pub date_temporal: bool,
    pub value: Option<&'a Column>,
    /// Value column exists and has an integer or float dtype.
    pub value_numeric: bool,
}

pub(crate) fn check<'a>(df: &'a DataFrame, config: &GateConfig) -> (Vec<Issue>, GateColumns<'a>) {
    let mut issues = Vec::new();
    if df.height() == 0 {
        issues.push(Issue::EmptyResult);
    }

    let date = df.column(&config.date_column).ok();
    let value = df.column(&config.value_column).ok();

    let mut date_temporal = false;
    match date {
        None => issues.push(Issue::MissingColumn {
            column: config.date_column.clone(),
        }),
        Some(column) if is_temporal(column.dtype()) => date_temporal = true,
        Some(column) => issues.push(Issue::DateNotTemporal {
            column: config.date_column.clone(),
            dtype: column.dtype().to_string(),
        }),
    }

    let mut value_numeric = false;
    match value {
        None => issues.push(Issue::MissingColumn {
            column: config.value_column.clone(),
        }),
        Some(column) if is_numeric(column.dtype()) => value_numeric = true,
        Some(column) => issues.push(Issue::ValueNotNumeric {
            column: config.value_column.clone(),
            dtype: column.dtype().to_string(),
        }),
    }

    (
        issues,
        GateColumns {
            date,
            date_temporal,
            value,
            value_numeric,
        },
    )
}

fn is_temporal(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Date | DataType::Datetime(_, _))
}

fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_integer() || dtype.is_float()
}
