//! Whole-row duplicate check.

use melt_common::count_duplicate_rows;
use polars::prelude::{DataFrame, PolarsResult};
use tracing::warn;

use crate::issue::Issue;

pub(crate) fn check(df: &DataFrame) -> Vec<Issue> {
    issues_for(count_duplicate_rows(df))
}

/// A table whose rows could not be compared is not known to be duplicate-free.
fn issues_for(counted: PolarsResult<usize>) -> Vec<Issue> {
    match counted {
        Ok(0) => vec![],
        Ok(duplicate_count) => vec![Issue::DuplicateRows { duplicate_count }],
        Err(error) => {
            warn!(%error, "duplicate check could not read rows");
            vec![Issue::DuplicateCheckFailed {
                reason: error.to_string(),
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use melt_model::GateConfig;
    use polars::prelude::PolarsError;

    use super::*;
    use crate::issue::Severity;

    #[test]
    fn unreadable_rows_fail_the_check() {
        let issues = issues_for(Err(PolarsError::ComputeError("row out of bounds".into())));
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], Issue::DuplicateCheckFailed { .. }));
        assert_eq!(issues[0].severity(&GateConfig::new("value")), Severity::Error);
        insta::assert_snapshot!(
            issues[0].to_string(),
            @"duplicate check could not run: row out of bounds"
        );
    }

    #[test]
    fn counts_map_to_issues() {
        assert!(issues_for(Ok(0)).is_empty());
        assert_eq!(
            issues_for(Ok(3)),
            vec![Issue::DuplicateRows { duplicate_count: 3 }]
        );
    }
}
