//! Dataset specifications and the built-in presets.
//!
//! A [`DatasetSpec`] is the fixed, explicit schema of one wide source file:
//! which columns identify an entity, how measure columns are recognized,
//! what type every canonical output column has, and how measure headers
//! encode dates. Nothing about the schema is inferred from the data.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::selector::MeasureSelector;
use crate::types::ColumnType;

/// Name of the unpivoted date column in every long table.
pub const DATE_COLUMN: &str = "date";

/// Header format of the reference measure columns (`1/22/20`).
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%y";

/// Value column name used when a dataset does not name its measure.
pub const DEFAULT_VALUE_NAME: &str = "value";

/// Schema of one wide source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Short name used for output files and logging.
    pub name: String,

    /// Source file name inside the data directory.
    #[serde(default)]
    pub file_name: Option<String>,

    /// Source identifier columns, spelled as in the wide table.
    pub identifier_columns: Vec<String>,

    /// Predicate selecting measure (date) columns.
    #[serde(default)]
    pub measure_selector: MeasureSelector,

    /// Canonical column name to target type.
    #[serde(default)]
    pub type_map: BTreeMap<String, ColumnType>,

    /// `chrono` format string of the measure headers.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Canonical name of the value column in the long table.
    #[serde(default = "default_value_name")]
    pub value_name: String,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_value_name() -> String {
    DEFAULT_VALUE_NAME.to_string()
}

impl DatasetSpec {
    pub fn new(name: impl Into<String>, identifier_columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            identifier_columns,
            measure_selector: MeasureSelector::default(),
            type_map: BTreeMap::new(),
            date_format: default_date_format(),
            value_name: default_value_name(),
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_measure_selector(mut self, selector: MeasureSelector) -> Self {
        self.measure_selector = selector;
        self
    }

    #[must_use]
    pub fn with_type(mut self, column: impl Into<String>, column_type: ColumnType) -> Self {
        self.type_map.insert(column.into(), column_type);
        self
    }

    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    #[must_use]
    pub fn with_value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = name.into();
        self
    }

    /// Declared type of a canonical column, if any.
    pub fn column_type(&self, canonical: &str) -> Option<ColumnType> {
        self.type_map.get(canonical).copied()
    }

    /// Load a dataset spec from a JSON file and check it.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: Self = serde_json::from_str(&contents).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        spec.check()?;
        Ok(spec)
    }

    /// Reject specs that cannot describe a valid long table.
    pub fn check(&self) -> Result<()> {
        let invalid = |reason: String| ModelError::InvalidDataset {
            dataset: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("dataset name is empty".to_string()));
        }
        if self.identifier_columns.is_empty() {
            return Err(invalid("no identifier columns".to_string()));
        }
        let mut seen = BTreeSet::new();
        for column in &self.identifier_columns {
            if !seen.insert(column.as_str()) {
                return Err(invalid(format!("identifier column '{column}' listed twice")));
            }
        }
        if self.value_name.trim().is_empty() {
            return Err(invalid("value column name is empty".to_string()));
        }
        if self.value_name == DATE_COLUMN {
            return Err(invalid(format!(
                "value column cannot be named '{DATE_COLUMN}'"
            )));
        }
        if self.date_format.trim().is_empty() {
            return Err(invalid("date format is empty".to_string()));
        }
        self.measure_selector.compile()?;
        Ok(())
    }

    /// Global confirmed cases (`RAW_global_confirmed_cases.csv`).
    pub fn global_confirmed() -> Self {
        global_base("global_confirmed", "RAW_global_confirmed_cases.csv")
            .with_value_name("confirmed_cases")
    }

    /// Global deaths (`RAW_global_deaths.csv`).
    pub fn global_deaths() -> Self {
        global_base("global_deaths", "RAW_global_deaths.csv").with_value_name("deaths")
    }

    /// US county-level confirmed cases (`RAW_us_confirmed_cases.csv`).
    pub fn us_confirmed() -> Self {
        us_base("us_confirmed", "RAW_us_confirmed_cases.csv", false)
            .with_value_name("confirmed_cases")
    }

    /// US county-level deaths (`RAW_us_deaths.csv`); carries `Population`.
    pub fn us_deaths() -> Self {
        us_base("us_deaths", "RAW_us_deaths.csv", true).with_value_name("deaths")
    }
}

fn global_base(name: &str, file_name: &str) -> DatasetSpec {
    let identifiers = ["Province/State", "Country/Region", "Lat", "Long"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    DatasetSpec::new(name, identifiers)
        .with_file_name(file_name)
        .with_type("provincestate", ColumnType::Text)
        .with_type("countryregion", ColumnType::Text)
        .with_type("lat", ColumnType::Float)
        .with_type("long", ColumnType::Float)
}

fn us_base(name: &str, file_name: &str, with_population: bool) -> DatasetSpec {
    let mut identifiers: Vec<String> = [
        "Province_State",
        "Admin2",
        "UID",
        "iso2",
        "iso3",
        "code3",
        "FIPS",
        "Country_Region",
        "Lat",
        "Long_",
        "Combined_Key",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect();
    if with_population {
        identifiers.push("Population".to_string());
    }
    let mut spec = DatasetSpec::new(name, identifiers)
        .with_file_name(file_name)
        .with_type("province_state", ColumnType::Text)
        .with_type("admin2", ColumnType::Text)
        .with_type("uid", ColumnType::Text)
        .with_type("iso2", ColumnType::Text)
        .with_type("iso3", ColumnType::Text)
        .with_type("code3", ColumnType::Text)
        .with_type("fips", ColumnType::Text)
        .with_type("country_region", ColumnType::Text)
        .with_type("lat", ColumnType::Float)
        .with_type("long", ColumnType::Float)
        .with_type("combined_key", ColumnType::Text);
    if with_population {
        spec = spec.with_type("population", ColumnType::Integer);
    }
    spec
}

/// All built-in dataset presets, in processing order.
pub fn presets() -> Vec<DatasetSpec> {
    vec![
        DatasetSpec::global_confirmed(),
        DatasetSpec::global_deaths(),
        DatasetSpec::us_confirmed(),
        DatasetSpec::us_deaths(),
    ]
}

/// Look up a preset by its name.
pub fn preset(name: &str) -> Result<DatasetSpec> {
    presets()
        .into_iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ModelError::UnknownPreset(name.to_string()))
}
