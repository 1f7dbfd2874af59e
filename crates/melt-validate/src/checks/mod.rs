//! Individual gate checks.
//!
//! Every check is independent and read-only; a check that cannot run
//! because its column is missing or mistyped reports nothing, since the
//! schema check already covers that.

pub(crate) mod dates;
pub(crate) mod duplicates;
pub(crate) mod nulls;
pub(crate) mod schema;
pub(crate) mod values;

/// Sample values collected per issue.
pub(crate) const MAX_SAMPLES: usize = 5;
