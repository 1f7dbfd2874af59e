//! Expected-file manifests for downloaded datasets.
//!
//! The acquisition step downloads and unzips an archive into a directory;
//! the manifest is the list of files that archive must have produced.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Files expected in a data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub files: Vec<String>,
}

/// Outcome of checking a directory against a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCheck {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

impl ManifestCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

impl DatasetManifest {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// The four wide tables the pipeline normalizes.
    pub fn covid_raw() -> Self {
        Self::new([
            "RAW_global_confirmed_cases.csv",
            "RAW_global_deaths.csv",
            "RAW_us_confirmed_cases.csv",
            "RAW_us_deaths.csv",
        ])
    }

    /// Every file of the full downloaded archive, including the
    /// pre-aggregated `CONVENIENT_*` tables the pipeline does not read.
    pub fn covid_archive() -> Self {
        Self::new([
            "CONVENIENT_global_confirmed_cases.csv",
            "CONVENIENT_global_deaths.csv",
            "CONVENIENT_global_metadata.csv",
            "CONVENIENT_us_confirmed_cases.csv",
            "CONVENIENT_us_deaths.csv",
            "CONVENIENT_us_metadata.csv",
            "RAW_global_confirmed_cases.csv",
            "RAW_global_deaths.csv",
            "RAW_us_confirmed_cases.csv",
            "RAW_us_deaths.csv",
        ])
    }

    /// Path of every manifest file inside `dir`.
    pub fn paths(&self, dir: &Path) -> Vec<PathBuf> {
        self.files.iter().map(|file| dir.join(file)).collect()
    }

    /// Partition the manifest into present and missing files.
    pub fn check_files(&self, dir: &Path) -> ManifestCheck {
        let mut check = ManifestCheck::default();
        for file in &self.files {
            if dir.join(file).is_file() {
                check.present.push(file.clone());
            } else {
                check.missing.push(file.clone());
            }
        }
        check
    }

    /// Fail with every missing file when the directory is incomplete.
    pub fn require_files(&self, dir: &Path) -> Result<ManifestCheck> {
        let check = self.check_files(dir);
        if check.is_complete() {
            Ok(check)
        } else {
            Err(IngestError::MissingFiles {
                dir: dir.to_path_buf(),
                missing: check.missing,
            })
        }
    }
}
