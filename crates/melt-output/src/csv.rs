//! Long-table CSV writer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, SerWriter};
use serde::Serialize;
use tracing::info;

use crate::accepted::Accepted;
use crate::checksum::compute_file_sha256;
use crate::error::{OutputError, Result};

/// A CSV file produced by [`write_long_csv`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenTable {
    pub path: PathBuf,
    pub rows: usize,
    /// SHA256 of the file contents, lowercase hex.
    pub sha256: String,
}

/// Write an accepted long table as CSV with a header row.
///
/// Dates are written in ISO form (`2020-01-22`). Parent directories are
/// created as needed and an existing file is replaced.
pub fn write_long_csv(table: &mut Accepted, path: &Path) -> Result<WrittenTable> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer)
        .include_header(true)
        .finish(table.data_mut())
        .map_err(|source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let written = WrittenTable {
        path: path.to_path_buf(),
        rows: table.data().height(),
        sha256: compute_file_sha256(path)?,
    };
    info!(
        path = %written.path.display(),
        rows = written.rows,
        sha256 = %written.sha256,
        "wrote long table"
    );
    Ok(written)
}

/// Ensure a parent directory exists for a file path.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
