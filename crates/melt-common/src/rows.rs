//! Whole-row identity over a DataFrame.
//!
//! Two rows are duplicates when every cell holds the same typed value, with
//! null distinct from every non-null value. Used both to deduplicate engine
//! output and to check the duplicate-free postcondition.

use std::collections::HashSet;

use polars::prelude::{AnyValue, DataFrame, PolarsResult};

/// Hashable, exact identity of one cell.
///
/// Floats compare by bit pattern after folding `-0.0` into `0.0` and every
/// NaN into one NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    Date(i32),
    Text(String),
    /// Any other dtype, by its rendered form.
    Other(String),
}

impl CellKey {
    pub fn from_any(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Null,
            AnyValue::Boolean(b) => Self::Bool(b),
            AnyValue::Int8(v) => Self::Int(i64::from(v)),
            AnyValue::Int16(v) => Self::Int(i64::from(v)),
            AnyValue::Int32(v) => Self::Int(i64::from(v)),
            AnyValue::Int64(v) => Self::Int(v),
            AnyValue::UInt8(v) => Self::UInt(u64::from(v)),
            AnyValue::UInt16(v) => Self::UInt(u64::from(v)),
            AnyValue::UInt32(v) => Self::UInt(u64::from(v)),
            AnyValue::UInt64(v) => Self::UInt(v),
            AnyValue::Float32(v) => Self::float(f64::from(v)),
            AnyValue::Float64(v) => Self::float(v),
            AnyValue::Date(days) => Self::Date(days),
            AnyValue::String(s) => Self::Text(s.to_string()),
            AnyValue::StringOwned(s) => Self::Text(s.to_string()),
            other => Self::Other(other.to_string()),
        }
    }

    fn float(v: f64) -> Self {
        let canonical = if v == 0.0 {
            0.0
        } else if v.is_nan() {
            f64::NAN
        } else {
            v
        };
        Self::Float(canonical.to_bits())
    }
}

/// Build one composite key per row covering every column.
pub fn row_keys(df: &DataFrame) -> PolarsResult<Vec<Vec<CellKey>>> {
    let width = df.width();
    let mut keys: Vec<Vec<CellKey>> = (0..df.height())
        .map(|_| Vec::with_capacity(width))
        .collect();
    for column in df.get_columns() {
        for (idx, key) in keys.iter_mut().enumerate() {
            key.push(CellKey::from_any(column.get(idx)?));
        }
    }
    Ok(keys)
}

/// `true` for every row that repeats an earlier row exactly.
pub fn duplicate_mask(df: &DataFrame) -> PolarsResult<Vec<bool>> {
    let keys = row_keys(df)?;
    let mut seen = HashSet::with_capacity(keys.len());
    Ok(keys.into_iter().map(|key| !seen.insert(key)).collect())
}

/// Number of rows that repeat an earlier row exactly.
pub fn count_duplicate_rows(df: &DataFrame) -> PolarsResult<usize> {
    Ok(duplicate_mask(df)?.into_iter().filter(|dup| *dup).count())
}
