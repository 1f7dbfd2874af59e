//! Tables that passed the quality gate.

use chrono::NaiveDate;
use melt_model::GateConfig;
use melt_validate::{GateReport, ValidationFailure, validate, validate_at};
use polars::prelude::DataFrame;

/// A long table together with the gate report that accepted it.
///
/// The only way to obtain one is to run the gate, so every writer that
/// takes an `Accepted` only ever persists validated data.
#[derive(Debug, Clone)]
pub struct Accepted {
    data: DataFrame,
    report: GateReport,
}

impl Accepted {
    /// Run the gate on `data` and wrap it if it passes.
    pub fn check(data: DataFrame, config: &GateConfig) -> Result<Self, ValidationFailure> {
        let report = validate(&data, config)?;
        Ok(Self { data, report })
    }

    /// Like [`Accepted::check`] with an explicit "today".
    pub fn check_at(
        data: DataFrame,
        config: &GateConfig,
        today: NaiveDate,
    ) -> Result<Self, ValidationFailure> {
        let report = validate_at(&data, config, today)?;
        Ok(Self { data, report })
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn report(&self) -> &GateReport {
        &self.report
    }

    pub fn into_inner(self) -> (DataFrame, GateReport) {
        (self.data, self.report)
    }

    pub(crate) fn data_mut(&mut self) -> &mut DataFrame {
        &mut self.data
    }
}
