//! Results of a pipeline run.

use std::path::PathBuf;

use chrono::NaiveDate;
use melt_output::{PublishOutcome, WrittenTable};

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub datasets: Vec<DatasetSummary>,
    pub published: Vec<PublishOutcome>,
    pub dry_run: bool,
    pub has_errors: bool,
}

impl RunResult {
    pub fn failed_datasets(&self) -> impl Iterator<Item = &DatasetSummary> {
        self.datasets.iter().filter(|summary| summary.error.is_some())
    }
}

/// Outcome of one dataset. Counts are zero for stages that did not run.
#[derive(Debug, Default)]
pub struct DatasetSummary {
    pub name: String,
    pub input_rows: usize,
    pub measure_columns: usize,
    pub output_rows: usize,
    pub duplicates_removed: usize,
    pub rows_out_of_range_dropped: usize,
    pub unparsed_headers: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// Gate warnings, rendered.
    pub warnings: Vec<String>,
    /// Gate failures, rendered.
    pub checks_failed: Vec<String>,
    pub output: Option<WrittenTable>,
    /// Why the dataset failed, with full context.
    pub error: Option<String>,
}
