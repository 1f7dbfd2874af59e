//! Target semantic types for long-table columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared semantic type of a canonical output column.
///
/// Numeric-as-text identifiers (FIPS, UID) are declared `Text`; the
/// coercion step renders them without a trailing `.0` so a code stays a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Float,
}

impl ColumnType {
    /// Parse a column type from its configuration spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "string" | "str" => Some(Self::Text),
            "integer" | "int" | "int64" => Some(Self::Integer),
            "float" | "double" | "float64" => Some(Self::Float),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
