//! Data ingestion for wide time-series tables.
//!
//! The acquisition collaborator materializes a set of CSV files in a local
//! directory. This crate owns the receiving side of that hand-off:
//!
//! - **Manifest checks**: confirm every expected file is present before any
//!   processing starts, reporting all missing files at once
//! - **CSV loading**: read a wide table into a Polars `DataFrame`, rejecting
//!   missing files, unsupported encodings, and empty tables
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use melt_ingest::{DatasetManifest, read_wide_table, ReadOptions};
//!
//! let dir = Path::new("data/covid");
//! DatasetManifest::covid_raw().require_files(dir)?;
//! let wide = read_wide_table(&dir.join("RAW_us_deaths.csv"), &ReadOptions::default())?;
//! ```

mod csv;
mod error;
mod manifest;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{MAX_CSV_FILE_SIZE, ReadOptions, read_wide_table};

// === Manifest ===
pub use manifest::{DatasetManifest, ManifestCheck};
