//! Output generation for accepted long tables.
//!
//! - [`Accepted`]: a table that passed the quality gate
//! - [`write_long_csv`]: CSV persistence with a SHA256 checksum
//! - [`Publisher`] / [`LocalPublisher`]: hand-off of written files

mod accepted;
mod checksum;
mod csv;
mod error;
mod publish;

pub use accepted::Accepted;
pub use checksum::{compute_file_sha256, verify_sha256};
pub use csv::{WrittenTable, write_long_csv};
pub use error::{OutputError, Result};
pub use publish::{LocalPublisher, PublishOutcome, PublishStatus, Publisher};
