//! Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! None of these reach a client: a package that fails to index is logged and
//! left out, and an unknown query type is answered with the protocol's own
//! error shape.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The package directory has no recipe file.
    #[display("recipe not found: {}", _0.display())]
    RecipeNotFound(#[error(not(source))] PathBuf),
    /// The recipe file exists but could not be read.
    #[display("recipe unreadable: {}", _0.display())]
    RecipeUnreadable(#[error(not(source))] PathBuf),
    /// The recipe could not be decoded.
    #[display("recipe undecodable: {}", _0.display())]
    Recipe(#[error(not(source))] PathBuf),
    /// The `type` parameter is not one the engine answers.
    #[display("unsupported query type: {_0:?}")]
    UnknownQueryType(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RecipeUnreadable(_))
    }
}
