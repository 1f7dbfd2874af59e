//! CLI library components for `melt`.

pub mod logging;
pub mod pipeline;
pub mod types;
