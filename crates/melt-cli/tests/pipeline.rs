//! Integration tests for the run pipeline.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use melt_cli::pipeline::{PublishConfig, RunConfig, manifest_for, run_pipeline};
use melt_model::{DatasetSpec, EngineOptions, NegativePolicy, OutOfRangePolicy, presets};

const US_DEATHS: &str = "\
Province_State,Admin2,UID,iso2,iso3,code3,FIPS,Country_Region,Lat,Long_,Combined_Key,Population,1/22/20,1/23/20
Alabama,Autauga,84001001,US,USA,840,1001.0,US,32.5,-86.6,\"Autauga, Alabama, US\",55869,0,0
Alabama,Baldwin,84001003,US,USA,840,1003.0,US,30.7,-87.7,\"Baldwin, Alabama, US\",223234,0,1
";

const GLOBAL_DEATHS_NEGATIVE: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
,Afghanistan,33.9,67.7,0,-5
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 3, 10).unwrap()
}

fn engine() -> EngineOptions {
    EngineOptions::new(OutOfRangePolicy::Reject).with_chunk_size(1)
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn writes_long_table_for_each_dataset() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(data.path(), "RAW_us_deaths.csv", US_DEATHS);

    let config = RunConfig::new(data.path(), out.path(), vec![DatasetSpec::us_deaths()], engine())
        .with_today(today());
    let result = run_pipeline(&config).unwrap();

    assert!(!result.has_errors, "{:?}", result.datasets[0].error);
    let summary = &result.datasets[0];
    assert_eq!(summary.input_rows, 2);
    assert_eq!(summary.measure_columns, 2);
    assert_eq!(summary.output_rows, 4);
    assert_eq!(summary.min_date, NaiveDate::from_ymd_opt(2020, 1, 22));

    let written = summary.output.as_ref().unwrap();
    assert_eq!(written.path, out.path().join("us_deaths_long.csv"));
    let contents = fs::read_to_string(&written.path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "province_state,admin2,uid,iso2,iso3,code3,fips,country_region,lat,long,combined_key,population,date,deaths"
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].starts_with("Alabama,Autauga,84001001,US,USA,840,1001,US,"));
    assert!(rows[0].ends_with(",55869,2020-01-22,0"));
    assert!(rows[3].ends_with(",223234,2020-01-23,1"));
}

#[test]
fn failing_dataset_does_not_stop_the_run() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(data.path(), "RAW_us_deaths.csv", US_DEATHS);
    write(data.path(), "RAW_global_deaths.csv", GLOBAL_DEATHS_NEGATIVE);

    let config = RunConfig::new(
        data.path(),
        out.path(),
        vec![DatasetSpec::global_deaths(), DatasetSpec::us_deaths()],
        engine(),
    )
    .with_today(today());
    let result = run_pipeline(&config).unwrap();

    assert!(result.has_errors);
    let global = &result.datasets[0];
    assert!(global.output.is_none());
    assert!(global.error.as_deref().unwrap().contains("negative values present"));
    assert_eq!(global.checks_failed.len(), 1);
    assert!(result.datasets[1].output.is_some());
    assert!(!out.path().join("global_deaths_long.csv").exists());
}

#[test]
fn warn_policy_accepts_negative_values() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(data.path(), "RAW_global_deaths.csv", GLOBAL_DEATHS_NEGATIVE);

    let config = RunConfig::new(
        data.path(),
        out.path(),
        vec![DatasetSpec::global_deaths()],
        engine(),
    )
    .with_negative_policy(NegativePolicy::Warn)
    .with_today(today());
    let result = run_pipeline(&config).unwrap();

    assert!(!result.has_errors);
    assert_eq!(result.datasets[0].warnings.len(), 1);
    assert!(result.datasets[0].output.is_some());
}

#[test]
fn missing_input_files_stop_the_run_up_front() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(data.path(), "RAW_us_deaths.csv", US_DEATHS);

    let config = RunConfig::new(data.path(), out.path(), presets(), engine()).with_today(today());
    let err = run_pipeline(&config).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("RAW_global_confirmed_cases.csv"), "{message}");
    assert!(!message.contains("RAW_us_deaths.csv"), "{message}");
}

#[test]
fn dry_run_writes_nothing() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(data.path(), "RAW_us_deaths.csv", US_DEATHS);

    let config = RunConfig::new(
        data.path(),
        out.path().join("long"),
        vec![DatasetSpec::us_deaths()],
        engine(),
    )
    .with_dry_run(true)
    .with_today(today());
    let result = run_pipeline(&config).unwrap();

    assert!(!result.has_errors);
    assert!(result.datasets[0].output.is_none());
    assert!(!out.path().join("long").exists());
}

#[test]
fn publishes_written_files() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let bucket = tempfile::tempdir().unwrap();
    write(data.path(), "RAW_us_deaths.csv", US_DEATHS);

    let config = RunConfig::new(data.path(), out.path(), vec![DatasetSpec::us_deaths()], engine())
        .with_today(today())
        .with_publish(Some(PublishConfig {
            dir: bucket.path().to_path_buf(),
            prefix: "covid/long".to_string(),
        }));
    let result = run_pipeline(&config).unwrap();

    assert_eq!(result.published.len(), 1);
    assert!(result.published[0].is_success());
    assert!(
        bucket
            .path()
            .join("covid")
            .join("long")
            .join("us_deaths_long.csv")
            .exists()
    );
}

#[test]
fn manifest_lists_preset_files() {
    let manifest = manifest_for(&presets()).unwrap();
    assert_eq!(
        manifest.files,
        vec![
            "RAW_global_confirmed_cases.csv",
            "RAW_global_deaths.csv",
            "RAW_us_confirmed_cases.csv",
            "RAW_us_deaths.csv",
        ]
    );

    let unnamed = DatasetSpec::new("adhoc", vec!["Key".to_string()]);
    assert!(manifest_for(&[unnamed]).is_err());
}
