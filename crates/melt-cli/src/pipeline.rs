//! Per-dataset pipeline: ingest, standardize, validate, write.
//!
//! Datasets run one after another and independently: a failing dataset is
//! recorded on its summary and the run moves on to the next one.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use melt_ingest::{DatasetManifest, ReadOptions, read_wide_table};
use melt_model::{DatasetSpec, EngineOptions, GateConfig, NegativePolicy};
use melt_output::{Accepted, LocalPublisher, Publisher, write_long_csv};
use melt_transform::standardize;
use melt_validate::Issue;
use tracing::{error, info, info_span};

use crate::types::{DatasetSummary, RunResult};

/// Where and under which prefix written files are published.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub dir: PathBuf,
    pub prefix: String,
}

/// Everything one `run` needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub datasets: Vec<DatasetSpec>,
    pub engine: EngineOptions,
    pub negative_policy: NegativePolicy,
    pub read: ReadOptions,
    pub dry_run: bool,
    /// Pinned "today" for range handling; `None` uses the current UTC date.
    pub today: Option<NaiveDate>,
    pub publish: Option<PublishConfig>,
}

impl RunConfig {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        datasets: Vec<DatasetSpec>,
        engine: EngineOptions,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            datasets,
            engine,
            negative_policy: NegativePolicy::default(),
            read: ReadOptions::default(),
            dry_run: false,
            today: None,
            publish: None,
        }
    }

    #[must_use]
    pub fn with_negative_policy(mut self, policy: NegativePolicy) -> Self {
        self.negative_policy = policy;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    #[must_use]
    pub fn with_publish(mut self, publish: Option<PublishConfig>) -> Self {
        self.publish = publish;
        self
    }
}

/// Manifest of the input files the given datasets read.
pub fn manifest_for(datasets: &[DatasetSpec]) -> Result<DatasetManifest> {
    let files = datasets
        .iter()
        .map(|spec| {
            spec.file_name
                .clone()
                .ok_or_else(|| anyhow!("dataset '{}' does not name an input file", spec.name))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DatasetManifest::new(files))
}

/// Path of the long CSV written for a dataset.
pub fn output_path(output_dir: &Path, spec: &DatasetSpec) -> PathBuf {
    output_dir.join(format!("{}_long.csv", spec.name))
}

/// Run every configured dataset, then publish what was written.
///
/// # Errors
///
/// Fails only when the run cannot start (an input file is missing or a
/// dataset names no file). Per-dataset failures are recorded on the result.
pub fn run_pipeline(config: &RunConfig) -> Result<RunResult> {
    let start = Instant::now();
    manifest_for(&config.datasets)?
        .require_files(&config.data_dir)
        .context("check input files")?;

    let today = config
        .today
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let engine = config.engine.clone().with_reference_date(today);

    let datasets: Vec<DatasetSummary> = config
        .datasets
        .iter()
        .map(|spec| run_dataset(spec, config, &engine, today))
        .collect();

    let published = match (&config.publish, config.dry_run) {
        (Some(publish), false) => {
            let files: Vec<PathBuf> = datasets
                .iter()
                .filter_map(|summary| summary.output.as_ref())
                .map(|written| written.path.clone())
                .collect();
            let span = info_span!("publish", prefix = %publish.prefix);
            let _guard = span.enter();
            LocalPublisher::new(&publish.dir).publish(&files, &publish.prefix)
        }
        _ => Vec::new(),
    };

    let has_errors = datasets.iter().any(|summary| summary.error.is_some())
        || published.iter().any(|outcome| !outcome.is_success());
    info!(
        datasets = datasets.len(),
        failed = datasets.iter().filter(|s| s.error.is_some()).count(),
        published = published.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunResult {
        output_dir: config.output_dir.clone(),
        datasets,
        published,
        dry_run: config.dry_run,
        has_errors,
    })
}

/// Run one dataset, capturing any failure on the summary.
pub fn run_dataset(
    spec: &DatasetSpec,
    config: &RunConfig,
    engine: &EngineOptions,
    today: NaiveDate,
) -> DatasetSummary {
    let span = info_span!("dataset", dataset = %spec.name);
    let _guard = span.enter();
    let mut summary = DatasetSummary {
        name: spec.name.clone(),
        ..DatasetSummary::default()
    };
    if let Err(err) = process_dataset(spec, config, engine, today, &mut summary) {
        let message = format!("{err:#}");
        error!(error = %message, "dataset failed");
        summary.error = Some(message);
    }
    summary
}

fn process_dataset(
    spec: &DatasetSpec,
    config: &RunConfig,
    engine: &EngineOptions,
    today: NaiveDate,
    summary: &mut DatasetSummary,
) -> Result<()> {
    spec.check().context("invalid dataset configuration")?;
    let file_name = spec
        .file_name
        .as_deref()
        .ok_or_else(|| anyhow!("dataset '{}' does not name an input file", spec.name))?;
    let path = config.data_dir.join(file_name);

    let wide = info_span!("ingest", file = %file_name).in_scope(|| {
        read_wide_table(&path, &config.read).with_context(|| format!("read {}", path.display()))
    })?;
    summary.input_rows = wide.height();

    let standardized = standardize(&wide, spec, engine)
        .with_context(|| format!("standardize {}", spec.name))?;
    drop(wide);
    let stats = &standardized.stats;
    summary.measure_columns = stats.measure_columns;
    summary.duplicates_removed = stats.duplicates_removed;
    summary.rows_out_of_range_dropped = stats.rows_out_of_range_dropped;
    summary.unparsed_headers = stats.unparsed_headers.clone();
    summary.output_rows = stats.output_rows;

    let gate = GateConfig::new(standardized.value_column.as_str())
        .with_negative_policy(config.negative_policy)
        .with_epoch_lower_bound(engine.epoch_lower_bound);
    let mut accepted = match Accepted::check_at(standardized.data, &gate, today) {
        Ok(accepted) => accepted,
        Err(failure) => {
            summary.checks_failed = failure.checks_failed.iter().map(Issue::message).collect();
            summary.warnings = failure.warnings.iter().map(Issue::message).collect();
            return Err(failure.into());
        }
    };
    let report = accepted.report();
    summary.min_date = report.min_date;
    summary.max_date = report.max_date;
    summary.warnings = report.warnings.iter().map(Issue::message).collect();

    if config.dry_run {
        info!("dry run: skipping output");
        return Ok(());
    }
    let out_path = output_path(&config.output_dir, spec);
    let written = info_span!("write").in_scope(|| {
        write_long_csv(&mut accepted, &out_path)
            .with_context(|| format!("write {}", out_path.display()))
    })?;
    summary.output = Some(written);
    Ok(())
}
