use std::fs;
use std::path::PathBuf;

use melt_ingest::{IngestError, ReadOptions, read_wide_table};
use polars::prelude::DataType;

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

#[test]
fn reads_wide_table_with_date_headers() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_csv(
        &dir,
        "wide.csv",
        "Country_Region,Lat,Long_,1/22/20,1/23/20\nUS,40.0,-100.0,10,12\nCanada,56.1,-106.3,0,1\n",
    );

    let df = read_wide_table(&path, &ReadOptions::default()).expect("read");

    assert_eq!(df.height(), 2);
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["Country_Region", "Lat", "Long_", "1/22/20", "1/23/20"]);
    assert_eq!(df.column("1/22/20").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("Lat").unwrap().dtype(), &DataType::Float64);
}

#[test]
fn header_only_file_is_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_csv(&dir, "empty.csv", "Country_Region,1/22/20\n");
    let err = read_wide_table(&path, &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyTable { .. }), "{err}");
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = read_wide_table(&dir.path().join("nope.csv"), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn size_limit_is_enforced() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_csv(&dir, "wide.csv", "A,1/22/20\nx,1\n");
    let options = ReadOptions::default().with_max_file_size(4);
    let err = read_wide_table(&path, &options).unwrap_err();
    assert!(matches!(err, IngestError::FileTooLarge { .. }));
}
