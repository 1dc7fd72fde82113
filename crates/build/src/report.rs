use std::path::PathBuf;

use exn::{OptionExt, ResultExt};
use serde::Deserialize;

use crate::error::{ErrorKind, Result};

/// Line printed by the build tool right before its JSON report.
pub const MARKER: &str = "JsonDone\n";

/// The JSON report following [`MARKER`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Report {
    /// Absolute path of the built archive.
    pub file: PathBuf,
}
impl Report {
    /// Finds the first [`MARKER`] in `output` and parses everything after it.
    pub fn parse(output: &str) -> Result<Self> {
        let position = output.find(MARKER).ok_or_raise(|| ErrorKind::MarkerNotFound)?;
        let json = &output[position + MARKER.len()..];
        serde_json::from_str(json).or_raise(|| ErrorKind::InvalidReport)
    }
}
