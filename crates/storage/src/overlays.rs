use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::git::Git;
use crate::path::{contain, validate_component};

/// Name of the build recipe inside every package directory.
pub const RECIPE_FILENAME: &str = "PKGBUILD";

/// Handle on the overlays root directory.
///
/// All lookups go through [`validate_component`], so a request for overlay
/// `..` or package `a/b` is rejected rather than joined onto the root.
#[derive(Debug, Clone)]
pub struct Overlays {
    root: PathBuf,
}
impl Overlays {
    /// Create a handle on the overlays root.
    ///
    /// The root is canonicalized when it exists, so that containment checks
    /// against canonical paths reported by external tools line up. A root
    /// that doesn't exist yet is kept as given; every overlay in it will
    /// simply index as empty.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::fs::canonicalize(&root).unwrap_or(root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the named overlay. Existence is not checked.
    pub fn overlay_dir(&self, overlay: &str) -> Result<PathBuf> {
        Ok(self.root.join(validate_component(overlay)?))
    }

    /// Directory of a package, which must exist and contain a recipe file.
    #[instrument(level = "debug", skip(self))]
    pub fn package_dir(&self, overlay: &str, package: &str) -> Result<PathBuf> {
        let dir = self.overlay_dir(overlay)?.join(validate_component(package)?);
        if !dir.is_dir() {
            exn::bail!(ErrorKind::NotFound(dir));
        }
        let recipe = dir.join(RECIPE_FILENAME);
        if !recipe.is_file() {
            exn::bail!(ErrorKind::NotFound(recipe));
        }
        Ok(dir)
    }

    /// Resolves a file path reported by an external tool, making sure that
    /// (after following symlinks) it lives under the overlays root.
    ///
    /// Returns the canonical absolute path to the file.
    #[instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn resolve_output(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if !path.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
        }
        let canonical = std::fs::canonicalize(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        })?;
        // The root may have appeared (or been repointed) since construction.
        let root = std::fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());
        let relative = contain(&root, &canonical)?;
        Ok(root.join(relative))
    }

    /// Brings an overlay checkout up to date with its `origin` remote.
    ///
    /// Blocking: this runs several git subprocesses in sequence.
    #[instrument(skip(self, git))]
    pub fn update(&self, git: &Git, overlay: &str) -> Result<()> {
        let dir = self.overlay_dir(overlay)?;
        if !dir.join(".git").is_dir() {
            exn::bail!(ErrorKind::NotARepository(dir));
        }
        git.fast_forward(&dir)
    }
}
