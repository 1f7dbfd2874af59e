//! Publishing written files to a destination.
//!
//! The remote upload itself lives outside this workspace; [`Publisher`] is
//! the seam it plugs into. [`LocalPublisher`] copies into a directory tree
//! and serves local runs and tests.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

/// Result of publishing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    pub file: PathBuf,
    pub status: PublishStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PublishStatus {
    Published { location: String },
    Failed { error: String },
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, PublishStatus::Published { .. })
    }
}

/// Uploads files under a destination prefix.
///
/// One outcome per input file, in input order. A failed file does not stop
/// the remaining files.
pub trait Publisher {
    fn publish(&self, files: &[PathBuf], prefix: &str) -> Vec<PublishOutcome>;
}

/// Copies files into `<root>/<prefix>/<file name>`.
#[derive(Debug, Clone)]
pub struct LocalPublisher {
    root: PathBuf,
}

impl LocalPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn publish_one(&self, file: &Path, prefix: &str) -> Result<PathBuf, String> {
        let name = file
            .file_name()
            .ok_or_else(|| format!("{} has no file name", file.display()))?;
        let dir = self.root.join(prefix_path(prefix)?);
        fs::create_dir_all(&dir).map_err(|e| format!("create {}: {e}", dir.display()))?;
        let target = dir.join(name);
        fs::copy(file, &target).map_err(|e| format!("copy to {}: {e}", target.display()))?;
        Ok(target)
    }
}

/// Relative path for a `/`-separated prefix.
///
/// Only plain directory names are accepted, so the result stays under the
/// publisher root.
fn prefix_path(prefix: &str) -> Result<PathBuf, String> {
    if prefix.starts_with('/') {
        return Err(format!("prefix {prefix:?} must be relative"));
    }
    let mut path = PathBuf::new();
    for part in prefix.split('/').filter(|part| !part.is_empty()) {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => path.push(name),
            _ => return Err(format!("prefix {prefix:?} has invalid part {part:?}")),
        }
    }
    Ok(path)
}

impl Publisher for LocalPublisher {
    fn publish(&self, files: &[PathBuf], prefix: &str) -> Vec<PublishOutcome> {
        files
            .iter()
            .map(|file| {
                let status = match self.publish_one(file, prefix) {
                    Ok(target) => {
                        info!(file = %file.display(), location = %target.display(), "published");
                        PublishStatus::Published {
                            location: target.display().to_string(),
                        }
                    }
                    Err(error) => {
                        warn!(file = %file.display(), %error, "publish failed");
                        PublishStatus::Failed { error }
                    }
                };
                PublishOutcome {
                    file: file.clone(),
                    status,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_parts_become_directories() {
        assert_eq!(
            prefix_path("covid//2023-03-10/").unwrap(),
            Path::new("covid").join("2023-03-10")
        );
        assert_eq!(prefix_path("").unwrap(), PathBuf::new());
    }

    #[test]
    fn prefix_cannot_leave_root() {
        assert!(prefix_path("../outside").is_err());
        assert!(prefix_path("covid/../../outside").is_err());
        assert!(prefix_path("covid/./x").is_err());
        assert!(prefix_path("/etc").is_err());
    }
}
