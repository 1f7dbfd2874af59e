use std::fs;
use std::path::PathBuf;

use melt_output::{LocalPublisher, PublishStatus, Publisher};

#[test]
fn copies_files_under_prefix() {
    let source = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let file = source.path().join("global_deaths_long.csv");
    fs::write(&file, "date,deaths\n").unwrap();

    let publisher = LocalPublisher::new(target.path());
    let outcomes = publisher.publish(std::slice::from_ref(&file), "covid/2023-03-10");

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    let copied = target
        .path()
        .join("covid")
        .join("2023-03-10")
        .join("global_deaths_long.csv");
    assert_eq!(fs::read_to_string(copied).unwrap(), "date,deaths\n");
}

#[test]
fn reports_each_file_independently() {
    let source = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let present = source.path().join("a.csv");
    fs::write(&present, "x\n").unwrap();
    let missing: PathBuf = source.path().join("missing.csv");

    let outcomes = LocalPublisher::new(target.path()).publish(&[missing.clone(), present], "");

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].file, missing);
    assert!(matches!(outcomes[0].status, PublishStatus::Failed { .. }));
    assert!(outcomes[1].is_success());
    assert!(target.path().join("a.csv").exists());
}

#[test]
fn parent_directory_prefix_is_refused() {
    let source = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let root = target.path().join("published");
    let file = source.path().join("a.csv");
    fs::write(&file, "x\n").unwrap();

    let outcomes = LocalPublisher::new(&root).publish(std::slice::from_ref(&file), "../escaped");

    assert!(matches!(outcomes[0].status, PublishStatus::Failed { .. }));
    assert!(!target.path().join("escaped").exists());
    assert!(!root.exists());
}
