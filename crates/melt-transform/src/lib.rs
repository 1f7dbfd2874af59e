//! Wide-to-long reshape engine.
//!
//! [`standardize`] turns a wide table (identifier columns plus one measure
//! column per calendar date) into a long table with one row per
//! identifier-row × measure-column pair: canonical column names, declared
//! identifier types, a parsed `date`, and an integral value.
//!
//! The row axis is processed in chunks of [`EngineOptions::chunk_size`]
//! rows. Output does not depend on the chunk size or on
//! [`EngineOptions::concurrency`].
//!
//! [`EngineOptions::chunk_size`]: melt_model::EngineOptions::chunk_size
//! [`EngineOptions::concurrency`]: melt_model::EngineOptions::concurrency

mod coerce;
mod dates;
mod engine;
mod error;
mod layout;
mod naming;

pub use dates::{DateAxis, parse_date_axis, parse_header_date};
pub use engine::{Standardized, StandardizeStats, standardize, standardize_with_selector};
pub use error::{Result, TransformError};
pub use naming::standardize_column_name;
