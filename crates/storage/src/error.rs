//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Directory or file does not exist
    #[display("not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Path contains invalid characters or escapes root
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// Overlay or package name is not a single plain path component
    #[display("invalid name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// Path resolved outside of the overlays root
    #[display("path outside of root: {}", _0.display())]
    OutsideRoot(#[error(not(source))] PathBuf),
    /// Overlay directory is not a git checkout
    #[display("not a git repository: {}", _0.display())]
    NotARepository(#[error(not(source))] PathBuf),
    #[display("git executable not found in PATH")]
    GitNotFound,
    /// Git exited unsuccessfully. Exit code is absent when killed by signal.
    #[display("git {command} failed with exit code {code:?}")]
    GitFailed {
        command: &'static str,
        code: Option<i32>,
    },
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::GitFailed { .. })
    }
}
