//! Quality gate for long tables.
//!
//! [`validate`] runs every postcondition check against a standardized table
//! and either accepts it with a [`GateReport`] or rejects it with a
//! [`ValidationFailure`] listing every failed check.

mod checks;
mod gate;
pub mod issue;

pub use gate::{GateReport, ValidationFailure, validate, validate_at};
pub use issue::{Issue, Severity};
