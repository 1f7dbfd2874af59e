use chrono::NaiveDate;
use melt_model::{GateConfig, NegativePolicy};
use melt_validate::{Issue, validate_at};
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    ymd(2023, 3, 10)
}

fn date_column(dates: &[Option<NaiveDate>]) -> Column {
    let epoch = ymd(1970, 1, 1);
    let days: Vec<Option<i32>> = dates
        .iter()
        .map(|date| date.map(|d| (d - epoch).num_days() as i32))
        .collect();
    Series::new("date".into(), days)
        .cast(&DataType::Date)
        .unwrap()
        .into_column()
}

fn long_table(keys: &[&str], dates: &[Option<NaiveDate>], values: &[Option<i64>]) -> DataFrame {
    DataFrame::new(vec![
        Series::new("country_region".into(), keys).into_column(),
        date_column(dates),
        Series::new("value".into(), values).into_column(),
    ])
    .unwrap()
}

fn clean_table() -> DataFrame {
    long_table(
        &["US", "US"],
        &[Some(ymd(2020, 1, 22)), Some(ymd(2020, 1, 23))],
        &[Some(10), Some(12)],
    )
}

#[test]
fn accepts_clean_table() {
    let report = validate_at(&clean_table(), &GateConfig::new("value"), today()).unwrap();
    assert_eq!(report.rows, 2);
    assert_eq!(report.min_date, Some(ymd(2020, 1, 22)));
    assert_eq!(report.max_date, Some(ymd(2020, 1, 23)));
    assert!(report.warnings.is_empty());
}

#[test]
fn negative_values_fail_by_default() {
    let df = long_table(&["US"], &[Some(ymd(2020, 1, 22))], &[Some(-5)]);
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    assert_eq!(failure.checks_failed.len(), 1);
    assert!(matches!(
        failure.checks_failed[0],
        Issue::NegativeValues { negative_count: 1, .. }
    ));
    assert!(failure.to_string().contains("negative values present"));
}

#[test]
fn negative_values_warn_under_warn_policy() {
    let df = long_table(&["US"], &[Some(ymd(2020, 1, 22))], &[Some(-5)]);
    let config = GateConfig::new("value").with_negative_policy(NegativePolicy::Warn);
    let report = validate_at(&df, &config, today()).unwrap();
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].message().contains("negative values present"));
}

#[test]
fn null_dates_are_rejected() {
    let df = long_table(&["US", "US"], &[Some(ymd(2020, 1, 22)), None], &[Some(1), Some(2)]);
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    assert!(failure.to_string().contains("null dates present"));
}

#[test]
fn reports_every_failed_check() {
    let df = long_table(
        &["US", "US", "US"],
        &[None, Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 1))],
        &[Some(-5), Some(3), Some(3)],
    );
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    let names: Vec<&str> = failure.checks_failed.iter().map(Issue::check_name).collect();
    assert_eq!(names, vec!["null_dates", "duplicates", "non_negative", "max_date"]);
}

#[test]
fn failure_message_lists_checks_in_order() {
    let df = long_table(&["US", "US"], &[None, Some(ymd(2020, 2, 1))], &[Some(-5), Some(1)]);
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    insta::assert_snapshot!(
        failure.to_string(),
        @"quality gate failed: null dates present (1 rows in date); negative values present (1 rows in value, min -5)"
    );
}

#[test]
fn empty_table_is_rejected() {
    let df = long_table(&[], &[], &[]);
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    assert_eq!(failure.checks_failed, vec![Issue::EmptyResult]);
}

#[test]
fn missing_and_mistyped_columns() {
    let df = DataFrame::new(vec![
        Series::new("date".into(), ["2020-01-22"]).into_column(),
        Series::new("other".into(), [1i64]).into_column(),
    ])
    .unwrap();
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    assert_eq!(
        failure.checks_failed,
        vec![
            Issue::DateNotTemporal {
                column: "date".to_string(),
                dtype: DataType::String.to_string(),
            },
            Issue::MissingColumn {
                column: "value".to_string(),
            },
        ]
    );
}

#[test]
fn text_values_are_not_numeric() {
    let df = DataFrame::new(vec![
        date_column(&[Some(ymd(2020, 1, 22))]),
        Series::new("value".into(), ["ten"]).into_column(),
    ])
    .unwrap();
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    assert!(matches!(
        failure.checks_failed.as_slice(),
        [Issue::ValueNotNumeric { .. }]
    ));
}

#[test]
fn fractional_float_values_are_rejected() {
    let df = DataFrame::new(vec![
        date_column(&[Some(ymd(2020, 1, 22)), Some(ymd(2020, 1, 23))]),
        Series::new("value".into(), [1.0, 1.5]).into_column(),
    ])
    .unwrap();
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    assert_eq!(
        failure.checks_failed,
        vec![Issue::FractionalValues {
            column: "value".to_string(),
            fractional_count: 1,
            samples: vec!["1.5".to_string()],
        }]
    );
}

#[test]
fn dates_before_epoch_are_rejected() {
    let df = long_table(
        &["US", "US"],
        &[Some(ymd(2019, 12, 31)), Some(ymd(2020, 1, 1))],
        &[Some(1), Some(2)],
    );
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    assert_eq!(
        failure.checks_failed,
        vec![Issue::DateBeforeEpoch {
            column: "date".to_string(),
            min_date: ymd(2019, 12, 31),
            bound: ymd(2020, 1, 1),
            row_count: 1,
        }]
    );

    let relaxed = GateConfig::new("value").with_epoch_lower_bound(ymd(2019, 1, 1));
    assert!(validate_at(&df, &relaxed, today()).is_ok());
}

#[test]
fn future_dates_are_rejected() {
    let df = long_table(&["US"], &[Some(ymd(2023, 3, 11))], &[Some(1)]);
    let failure = validate_at(&df, &GateConfig::new("value"), today()).unwrap_err();
    assert_eq!(failure.checks_failed[0].check_name(), "max_date");
    assert!(validate_at(&df, &GateConfig::new("value"), ymd(2023, 3, 11)).is_ok());
}
