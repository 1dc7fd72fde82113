//! Recipe Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::Encoding;
use derive_more::{Display, Error};

/// A recipe error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for recipe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bytes are not valid in the attempted encoding.
    #[display("recipe is not valid {_0}")]
    Decode(#[error(not(source))] Encoding),
    /// Every encoding in the attempt list failed.
    #[display("recipe could not be decoded with any known encoding")]
    Undecodable,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The bytes on disk are either decodable or they aren't.
        false
    }
}
