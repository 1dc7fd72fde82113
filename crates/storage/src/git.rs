use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// The system `git` client.
///
/// Only used to fast-forward overlay checkouts; no git protocol handling
/// happens in-process.
#[derive(Debug, Clone)]
pub struct Git {
    binary: PathBuf,
}
impl Git {
    /// Locates `git` on the `PATH`.
    pub fn discover() -> Result<Self> {
        match which::which("git") {
            Ok(binary) => {
                tracing::debug!(git = %binary.display(), "Discovered git executable");
                Ok(Self { binary })
            },
            Err(_) => exn::bail!(ErrorKind::GitNotFound),
        }
    }

    /// Uses the given executable without looking it up.
    pub fn at(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }

    /// Throws away any local changes and fast-forwards to `origin`:
    /// `reset --hard`, `clean -fdx`, `fetch --all`, `merge --ff-only origin`.
    ///
    /// Stops at the first command that fails.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn fast_forward(&self, dir: &Path) -> Result<()> {
        self.run(dir, "reset", &["--hard"])?;
        self.run(dir, "clean", &["-fdx"])?;
        self.run(dir, "fetch", &["--all"])?;
        self.run(dir, "merge", &["--ff-only", "origin"])?;
        Ok(())
    }

    fn run(&self, dir: &Path, command: &'static str, args: &[&str]) -> Result<()> {
        let output = Command::new(&self.binary)
            .current_dir(dir)
            .arg(command)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(ErrorKind::Io)?;
        let (stdout, stderr) = (String::from_utf8_lossy(&output.stdout), String::from_utf8_lossy(&output.stderr));
        for line in stdout.lines().chain(stderr.lines()) {
            tracing::info!(command, "{line}");
        }
        if !output.status.success() {
            exn::bail!(ErrorKind::GitFailed { command, code: output.status.code() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_binary() {
        let tmp = TempDir::new().unwrap();
        let git = Git::at(tmp.path().join("definitely-not-git"));
        let err = git.fast_forward(tmp.path()).unwrap_err();
        assert!(matches!(*err, ErrorKind::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_stops_sequence() {
        // `false` accepts any arguments and always exits 1.
        let tmp = TempDir::new().unwrap();
        let git = Git::at("false");
        let err = git.fast_forward(tmp.path()).unwrap_err();
        assert!(matches!(*err, ErrorKind::GitFailed { command: "reset", code: Some(1) }));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_sequence() {
        let tmp = TempDir::new().unwrap();
        let git = Git::at("true");
        assert!(git.fast_forward(tmp.path()).is_ok());
    }
}
