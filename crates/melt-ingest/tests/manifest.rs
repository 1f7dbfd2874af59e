use std::fs;

use melt_ingest::{DatasetManifest, IngestError};

#[test]
fn reports_present_and_missing_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("RAW_global_deaths.csv"), "a\n1\n").expect("write");
    fs::write(dir.path().join("RAW_us_deaths.csv"), "a\n1\n").expect("write");

    let check = DatasetManifest::covid_raw().check_files(dir.path());

    assert_eq!(
        check.present,
        vec!["RAW_global_deaths.csv", "RAW_us_deaths.csv"]
    );
    assert_eq!(
        check.missing,
        vec!["RAW_global_confirmed_cases.csv", "RAW_us_confirmed_cases.csv"]
    );
    assert!(!check.is_complete());
}

#[test]
fn require_files_lists_every_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = DatasetManifest::covid_raw()
        .require_files(dir.path())
        .unwrap_err();
    match err {
        IngestError::MissingFiles { missing, .. } => assert_eq!(missing.len(), 4),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn directories_do_not_count_as_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::create_dir(dir.path().join("a.csv")).expect("mkdir");
    let check = DatasetManifest::new(["a.csv"]).check_files(dir.path());
    assert_eq!(check.missing, vec!["a.csv"]);
}

#[test]
fn archive_manifest_contains_raw_tables() {
    let archive = DatasetManifest::covid_archive();
    for file in DatasetManifest::covid_raw().files {
        assert!(archive.files.contains(&file), "{file} not in archive");
    }
    assert_eq!(archive.files.len(), 10);
}
