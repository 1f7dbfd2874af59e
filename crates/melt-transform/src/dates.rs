//! Date axis parsing for measure-column headers.

use chrono::NaiveDate;
use melt_model::DateParsePolicy;
use tracing::warn;

use crate::error::{Result, TransformError};

/// Parsed dates of the measure columns, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAxis {
    pub dates: Vec<Option<NaiveDate>>,
    /// Headers that failed to parse (permissive policy only).
    pub unparsed: Vec<String>,
}

/// Parse one header with the configured `chrono` format.
pub fn parse_header_date(header: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(header.trim(), format).ok()
}

/// Parse every measure header.
///
/// Under [`DateParsePolicy::Strict`] any failure aborts with all offending
/// headers; under [`DateParsePolicy::Permissive`] failures become `None`.
pub fn parse_date_axis(
    headers: &[String],
    format: &str,
    policy: DateParsePolicy,
) -> Result<DateAxis> {
    let mut dates = Vec::with_capacity(headers.len());
    let mut unparsed = Vec::new();
    for header in headers {
        let parsed = parse_header_date(header, format);
        if parsed.is_none() {
            unparsed.push(header.clone());
        }
        dates.push(parsed);
    }
    if !unparsed.is_empty() {
        match policy {
            DateParsePolicy::Strict => {
                return Err(TransformError::DateParse {
                    format: format.to_string(),
                    headers: unparsed,
                });
            }
            DateParsePolicy::Permissive => {
                warn!(
                    format = %format,
                    headers = ?unparsed,
                    "measure headers did not parse; their rows get null dates"
                );
            }
        }
    }
    Ok(DateAxis { dates, unparsed })
}
