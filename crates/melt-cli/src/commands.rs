use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use melt_ingest::{DatasetManifest, ManifestCheck};
use melt_model::{DatasetSpec, EngineOptions, default_epoch_lower_bound, preset, presets};
use tracing::info_span;

use melt_cli::pipeline::{PublishConfig, RunConfig, run_pipeline};
use melt_cli::types::RunResult;

use crate::cli::{CheckArgs, RunArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_datasets() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("File"),
        header_cell("Identifiers"),
        header_cell("Value"),
        header_cell("Date format"),
    ]);
    apply_table_style(&mut table);
    for spec in presets() {
        table.add_row(vec![
            Cell::new(&spec.name),
            Cell::new(spec.file_name.as_deref().unwrap_or("-")),
            Cell::new(spec.identifier_columns.join(", ")),
            Cell::new(&spec.value_name),
            Cell::new(&spec.date_format),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<ManifestCheck> {
    let manifest = if args.archive {
        DatasetManifest::covid_archive()
    } else {
        DatasetManifest::covid_raw()
    };
    let span = info_span!("check", dir = %args.data_dir.display());
    let _guard = span.enter();
    Ok(manifest.check_files(&args.data_dir))
}

pub fn run(args: &RunArgs) -> Result<RunResult> {
    let datasets = select_datasets(args)?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.data_dir.join("long"));
    let engine = EngineOptions::new(args.out_of_range.into())
        .with_chunk_size(args.chunk_size)
        .with_concurrency(args.concurrency.max(1))
        .with_date_policy(args.date_policy.into())
        .with_epoch_lower_bound(args.epoch.unwrap_or_else(default_epoch_lower_bound));
    let publish = args.publish_dir.as_ref().map(|dir| PublishConfig {
        dir: dir.clone(),
        prefix: args.prefix.clone(),
    });
    let config = RunConfig::new(&args.data_dir, output_dir, datasets, engine)
        .with_negative_policy(args.negative_policy.into())
        .with_dry_run(args.dry_run)
        .with_publish(publish);
    run_pipeline(&config)
}

fn select_datasets(args: &RunArgs) -> Result<Vec<DatasetSpec>> {
    if let Some(path) = &args.config {
        let spec = load_dataset_config(path)?;
        return Ok(vec![spec]);
    }
    if args.datasets.is_empty() {
        return Ok(presets());
    }
    args.datasets
        .iter()
        .map(|name| preset(name).with_context(|| format!("select dataset '{name}'")))
        .collect()
}

fn load_dataset_config(path: &Path) -> Result<DatasetSpec> {
    let spec = DatasetSpec::from_json_path(path)
        .with_context(|| format!("load dataset config {}", path.display()))?;
    spec.check()
        .with_context(|| format!("validate dataset config {}", path.display()))?;
    Ok(spec)
}
