//! Sign and integrality of the value column.

use melt_common::format_numeric;
use melt_model::GateConfig;
use polars::prelude::{Column, DataType};

use super::MAX_SAMPLES;
use super::schema::GateColumns;
use crate::issue::Issue;

pub(crate) fn check(columns: &GateColumns<'_>, config: &GateConfig) -> Vec<Issue> {
    let Some(column) = columns.value.filter(|_| columns.value_numeric) else {
        return vec![];
    };
    let Some(values) = as_f64(column) else {
        return vec![];
    };

    let mut issues = Vec::new();
    let negatives: Vec<f64> = values.iter().flatten().copied().filter(|v| *v < 0.0).collect();
    if !negatives.is_empty() {
        let min = negatives.iter().copied().fold(f64::INFINITY, f64::min);
        issues.push(Issue::NegativeValues {
            column: config.value_column.clone(),
            negative_count: negatives.len(),
            min_value: format_numeric(min),
        });
    }

    if column.dtype().is_float() {
        let fractional: Vec<f64> = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_finite() || v.fract() != 0.0)
            .collect();
        if !fractional.is_empty() {
            issues.push(Issue::FractionalValues {
                column: config.value_column.clone(),
                fractional_count: fractional.len(),
                samples: fractional
                    .iter()
                    .take(MAX_SAMPLES)
                    .map(|v| format_numeric(*v))
                    .collect(),
            });
        }
    }
    issues
}

fn as_f64(column: &Column) -> Option<Vec<Option<f64>>> {
    let cast = column.cast(&DataType::Float64).ok()?;
    let values = cast.as_materialized_series().f64().ok()?;
    Some(values.into_iter().collect())
}
