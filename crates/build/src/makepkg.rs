use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use exn::ResultExt;
use tracing::instrument;

use crate::Report;
use crate::error::{ErrorKind, Result};

/// The build tool executable.
#[derive(Debug, Clone)]
pub struct Makepkg {
    binary: PathBuf,
}
impl Makepkg {
    /// Uses `binary` as-is; problems surface on the first [`build`](Self::build).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }

    /// Resolves `binary` (a path, or a bare name looked up on the `PATH`) and
    /// checks that it is executable.
    pub fn discover(binary: impl AsRef<Path>) -> Result<Self> {
        let binary = binary.as_ref();
        match which::which(binary) {
            Ok(path) => {
                tracing::debug!(makepkg = %path.display(), "Discovered build tool");
                Ok(Self { binary: path })
            },
            Err(_) => exn::bail!(ErrorKind::NotFound(binary.to_path_buf())),
        }
    }

    /// Builds a source archive of the package in `package_dir` and returns
    /// the archive path from the tool's report.
    ///
    /// The tool runs with `-S`, in the package directory, with an empty
    /// environment and no stdin. Blocking: it runs for as long as the build
    /// does.
    #[instrument(skip(self), fields(makepkg = %self.binary.display()))]
    pub fn build(&self, package_dir: &Path) -> Result<PathBuf> {
        if !self.binary.is_file() {
            exn::bail!(ErrorKind::NotFound(self.binary.clone()));
        }
        let output = Command::new(&self.binary)
            .arg("-S")
            .current_dir(package_dir)
            .env_clear()
            .stdin(Stdio::null())
            .output()
            .or_raise(|| ErrorKind::Spawn)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(%stdout, %stderr, "Build tool finished");
        if !output.status.success() {
            tracing::warn!(code = ?output.status.code(), "Build tool exited unsuccessfully");
            exn::bail!(ErrorKind::ExitStatus(output.status.code()));
        }
        // The report is printed on stdout; stderr is only searched when a
        // wrapper sends everything there.
        let report = match Report::parse(&stdout) {
            Ok(report) => report,
            Err(err) if matches!(*err, ErrorKind::MarkerNotFound) => Report::parse(&stderr).inspect_err(|_| {
                tracing::error!(%stdout, %stderr, "Build report marker not found");
            })?,
            Err(err) => return Err(err),
        };
        tracing::info!(file = %report.file.display(), "Package built");
        Ok(report.file)
    }
}
