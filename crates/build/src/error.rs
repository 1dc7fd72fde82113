//! Build Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A build error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for build operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The build tool executable does not exist.
    #[display("build tool not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The build tool could not be started.
    #[display("failed to run build tool")]
    Spawn,
    /// The build tool exited unsuccessfully. Exit code is absent when killed by signal.
    #[display("build tool failed with exit code {_0:?}")]
    ExitStatus(#[error(not(source))] Option<i32>),
    /// The output has no report marker; the build most likely failed.
    #[display("build report marker not found in output")]
    MarkerNotFound,
    /// The text after the marker isn't a valid build report.
    #[display("invalid build report")]
    InvalidReport,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Spawn)
    }
}
