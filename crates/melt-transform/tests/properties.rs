use chrono::NaiveDate;
use melt_model::{DatasetSpec, EngineOptions, GateConfig, OutOfRangePolicy};
use melt_transform::{standardize, standardize_column_name};
use melt_validate::{Issue, validate_at};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

const HEADERS: [&str; 3] = ["1/22/20", "1/23/20", "1/24/20"];

fn wide(rows: &[(u8, [i64; 3])]) -> DataFrame {
    let mut columns = vec![
        Series::new(
            "Combined Key".into(),
            rows.iter().map(|(key, _)| format!("k{key}")).collect::<Vec<_>>(),
        )
        .into_column(),
    ];
    for (m, header) in HEADERS.iter().enumerate() {
        let values: Vec<i64> = rows.iter().map(|(_, cells)| cells[m]).collect();
        columns.push(Series::new((*header).into(), values).into_column());
    }
    DataFrame::new(columns).unwrap()
}

fn spec() -> DatasetSpec {
    DatasetSpec::new("prop", vec!["Combined Key".to_string()])
}

fn options(chunk_size: usize) -> EngineOptions {
    EngineOptions::new(OutOfRangePolicy::Reject)
        .with_reference_date(NaiveDate::from_ymd_opt(2023, 3, 10).unwrap())
        .with_chunk_size(chunk_size)
}

fn row_strategy() -> impl Strategy<Value = (u8, [i64; 3])> {
    (0u8..4, [0i64..3, 0i64..3, 0i64..3])
}

proptest! {
    #[test]
    fn standardized_names_are_fixed_points(name in ".{0,40}") {
        let once = standardize_column_name(&name);
        prop_assert_eq!(standardize_column_name(&once), once.clone());
        prop_assert!(once.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_'));
        prop_assert!(!once.starts_with('_') && !once.ends_with('_'));
        prop_assert!(!once.contains("__"));
    }

    #[test]
    fn chunking_never_changes_output(
        rows in prop::collection::vec(row_strategy(), 0..40),
        chunk_size in 1usize..50,
        concurrency in 1usize..5,
    ) {
        let wide = wide(&rows);
        let whole = standardize(&wide, &spec(), &options(rows.len().max(1))).unwrap();
        let chunked = standardize(
            &wide,
            &spec(),
            &options(chunk_size).with_concurrency(concurrency),
        )
        .unwrap();

        prop_assert_eq!(chunked.stats.rows_melted, rows.len() * HEADERS.len());
        prop_assert!(whole.data.equals_missing(&chunked.data));
        prop_assert_eq!(whole.stats.duplicates_removed, chunked.stats.duplicates_removed);
    }

    #[test]
    fn engine_output_is_duplicate_free(
        rows in prop::collection::vec(row_strategy(), 1..40),
        chunk_size in 1usize..10,
    ) {
        let out = standardize(&wide(&rows), &spec(), &options(chunk_size)).unwrap();
        let gate = GateConfig::new(out.value_column.clone());
        let today = NaiveDate::from_ymd_opt(2023, 3, 10).unwrap();
        let issues = match validate_at(&out.data, &gate, today) {
            Ok(report) => report.warnings,
            Err(failure) => failure.checks_failed,
        };
        prop_assert!(!issues.iter().any(|issue| matches!(issue, Issue::DuplicateRows { .. })), "engine output contained duplicate rows");
    }
}
