//! Path validation and containment.
//!
//! Request paths and names are joined onto fixed roots (the overlays root,
//! the static assets directory), and build outputs are reported back as
//! absolute paths by an external tool. Both directions are checked here so
//! nothing outside those roots is ever read or served.

use std::path::{Component, Path, PathBuf};

use exn::ResultExt;

use crate::error::{ErrorKind, Result};

/// Validates a relative path for use beneath a root directory.
/// Ensures that paths don't escape the root (no `..` traversal).
///
/// > **Note:** This is purely lexical. Symlinks inside the root are not
/// >           resolved. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use rpkg_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("css/style.css").is_ok());
/// assert!(validate_path("css/../favicon.ico").is_ok()); // (never leaves the root)
/// // Invalid paths
/// assert!(validate_path("../overlays/secret").is_err());
/// assert!(validate_path("css/../../b").is_err());
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(validate_path("/css/./theme//dark.css").unwrap(), Path::new("css/theme/dark.css"));
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Validates that `name` is exactly one plain path component, suitable for
/// an overlay or package directory name.
///
/// ```
/// use rpkg_storage::validate_component;
/// assert!(validate_component("cups-xerox").is_ok());
/// assert!(validate_component("..").is_err());
/// assert!(validate_component("a/b").is_err());
/// ```
pub fn validate_component(name: &str) -> Result<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(s)), None) if s == name && !name.contains('\0') => Ok(name),
        _ => exn::bail!(ErrorKind::InvalidName(name.to_string())),
    }
}

/// Checks that the absolute `path` lives under `root`, returning it relative
/// to `root`.
///
/// The comparison is component-based, so a sibling such as `/srv/overlays-old`
/// is not considered to be inside `/srv/overlays`. Any `..` that would climb
/// back out of `root` is rejected.
pub fn contain(root: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<PathBuf> {
    let (root, path) = (root.as_ref(), path.as_ref());
    if !path.is_absolute() {
        exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
    }
    let Ok(relative) = path.strip_prefix(root) else {
        exn::bail!(ErrorKind::OutsideRoot(path.to_path_buf()));
    };
    validate(relative).or_raise(|| ErrorKind::OutsideRoot(path.to_path_buf()))
}
