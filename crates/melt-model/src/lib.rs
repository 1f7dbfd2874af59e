//! Data model for wide-to-long normalization.
//!
//! Everything a run is configured with lives here as plain `serde` types:
//! the per-dataset [`DatasetSpec`] (identifier columns, measure selector,
//! target type map, date format), the engine's [`EngineOptions`], and the
//! quality gate's [`GateConfig`]. No type in this crate reads ambient state;
//! callers construct a configuration and pass it into every operation.

pub mod dataset;
pub mod error;
pub mod options;
pub mod selector;
pub mod types;

pub use dataset::{
    DATE_COLUMN, DEFAULT_DATE_FORMAT, DEFAULT_VALUE_NAME, DatasetSpec, preset, presets,
};
pub use error::{ModelError, Result};
pub use options::{
    DEFAULT_CHUNK_SIZE, DateParsePolicy, EngineOptions, GateConfig, NegativePolicy,
    OutOfRangePolicy, default_epoch_lower_bound,
};
pub use selector::{ColumnSelector, CompiledSelector, MeasureSelector};
pub use types::ColumnType;
