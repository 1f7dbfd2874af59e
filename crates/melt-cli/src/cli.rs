//! CLI argument definitions for `melt`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use melt_model::{DateParsePolicy, NegativePolicy, OutOfRangePolicy};

#[derive(Parser)]
#[command(
    name = "melt",
    version,
    about = "Normalize wide daily time-series CSVs into validated long tables",
    long_about = "Normalize wide daily time-series CSVs into validated long tables.\n\n\
                  Each dataset is read, reshaped to one row per entity and date,\n\
                  checked by the quality gate, and written as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize the datasets found in a data directory.
    Run(RunArgs),

    /// Report which expected input files are present.
    Check(CheckArgs),

    /// List the built-in dataset presets.
    Datasets,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding the downloaded CSV files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Output directory for long tables (default: <DATA_DIR>/long).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Process only this preset (repeatable).
    #[arg(long = "dataset", value_name = "NAME", conflicts_with = "config")]
    pub datasets: Vec<String>,

    /// Process a dataset described by a JSON file instead of the presets.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wide rows per chunk.
    #[arg(long = "chunk-size", value_name = "ROWS", default_value_t = melt_model::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Chunks processed in parallel (1 = sequential).
    #[arg(long = "concurrency", value_name = "N", default_value_t = 1)]
    pub concurrency: usize,

    /// Whether negative values fail the gate or only warn.
    #[arg(long = "negative-policy", value_enum, default_value = "fail")]
    pub negative_policy: NegativePolicyArg,

    /// Handling of measure headers that are not dates.
    #[arg(long = "date-policy", value_enum, default_value = "strict")]
    pub date_policy: DatePolicyArg,

    /// Handling of dates before the epoch or after today.
    #[arg(long = "out-of-range", value_enum, default_value = "reject")]
    pub out_of_range: OutOfRangeArg,

    /// Earliest plausible date (YYYY-MM-DD).
    #[arg(long = "epoch", value_name = "DATE")]
    pub epoch: Option<NaiveDate>,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Copy written files into this directory after the run.
    #[arg(long = "publish-dir", value_name = "DIR")]
    pub publish_dir: Option<PathBuf>,

    /// Destination prefix under the publish directory.
    #[arg(long = "prefix", value_name = "PREFIX", default_value = "long")]
    pub prefix: String,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Directory holding the downloaded CSV files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Check the full downloaded archive instead of only the files the
    /// pipeline reads.
    #[arg(long = "archive")]
    pub archive: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum NegativePolicyArg {
    Fail,
    Warn,
}

impl From<NegativePolicyArg> for NegativePolicy {
    fn from(arg: NegativePolicyArg) -> Self {
        match arg {
            NegativePolicyArg::Fail => NegativePolicy::Fail,
            NegativePolicyArg::Warn => NegativePolicy::Warn,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DatePolicyArg {
    Strict,
    Permissive,
}

impl From<DatePolicyArg> for DateParsePolicy {
    fn from(arg: DatePolicyArg) -> Self {
        match arg {
            DatePolicyArg::Strict => DateParsePolicy::Strict,
            DatePolicyArg::Permissive => DateParsePolicy::Permissive,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutOfRangeArg {
    Reject,
    Drop,
}

impl From<OutOfRangeArg> for OutOfRangePolicy {
    fn from(arg: OutOfRangeArg) -> Self {
        match arg {
            OutOfRangeArg::Reject => OutOfRangePolicy::Reject,
            OutOfRangeArg::Drop => OutOfRangePolicy::Drop,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
