//! Shared utilities for the melt crates.
//!
//! This crate provides the Polars `AnyValue` helpers that the transform and
//! validation crates use to read cells without caring about the physical
//! dtype a CSV reader happened to infer, plus whole-row duplicate detection and
//! epoch-day date conversions.

pub mod dates;
pub mod rows;
pub mod values;

// Re-export commonly used functions at crate root for convenience
pub use values::{
    any_to_f64, any_to_integral_i64, any_to_string, format_numeric, parse_f64,
    parse_integral_i64,
};
pub use dates::{epoch_days, from_epoch_days};
pub use rows::{CellKey, count_duplicate_rows, duplicate_mask, row_keys};
