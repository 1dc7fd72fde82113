use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use exn::ResultExt;
use rpkg_storage::RECIPE_FILENAME;
use tokio::fs;
use tracing::instrument;

use crate::Package;
use crate::error::{ErrorKind, Result};

/// All packages of one overlay, keyed (and iterated) by package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    pub name: String,
    pub packages: BTreeMap<String, Package>,
}
impl Overlay {
    pub fn empty(name: impl Into<String>) -> Self {
        Self { name: name.into(), packages: BTreeMap::new() }
    }

    pub fn get(&self, package: &str) -> Option<&Package> {
        self.packages.get(package)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Scans the immediate subdirectories of `path` and indexes every one
    /// with a readable `PKGBUILD`.
    ///
    /// Never fails: a missing overlay indexes as empty, and a package
    /// directory that can't be read or decoded is logged and left out.
    #[instrument(skip(path), fields(path = %path.as_ref().display(), packages))]
    pub async fn build(name: &str, path: impl AsRef<Path>, lines_to_parse: usize) -> Self {
        let mut overlay = Self::empty(name);
        let path = path.as_ref();
        let mut entries = match fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => match fs::read_dir(path).await {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(error = %err, "Overlay directory unreadable; indexing as empty");
                    return overlay;
                },
            },
            _ => {
                tracing::info!("Overlay directory not found; indexing as empty");
                return overlay;
            },
        };
        'entries: loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break 'entries,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed listing overlay directory; index may be incomplete");
                    break 'entries;
                },
            };
            // Follows symlinks, so linked package directories are indexed too.
            let dir = entry.path();
            if !fs::metadata(&dir).await.is_ok_and(|m| m.is_dir()) {
                continue;
            }
            let Ok(dirname) = entry.file_name().into_string() else {
                tracing::debug!(dir = %dir.display(), "Skipping directory with non UTF-8 name");
                continue;
            };
            match read_package(&dir, &dirname, &overlay.name, lines_to_parse).await {
                Ok(package) => {
                    overlay.packages.insert(dirname, package);
                },
                Err(err) => match &*err {
                    ErrorKind::RecipeNotFound(_) => tracing::debug!(package = %dirname, "No recipe; skipping"),
                    kind => tracing::error!(package = %dirname, error = %kind, "Can't read recipe; skipping"),
                },
            }
        }
        tracing::Span::current().record("packages", overlay.len());
        tracing::info!(overlay = %overlay.name, packages = overlay.len(), "Overlay indexed");
        overlay
    }
}

/// Reads a single package directory into a [`Package`].
#[instrument(level = "debug", skip(dir, lines_to_parse), fields(dir = %dir.display()))]
pub(crate) async fn read_package(dir: &Path, name: &str, overlay: &str, lines_to_parse: usize) -> Result<Package> {
    let recipe: PathBuf = dir.join(RECIPE_FILENAME);
    let bytes = match fs::read(&recipe).await {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => exn::bail!(ErrorKind::RecipeNotFound(recipe)),
        result => result.or_raise(|| ErrorKind::RecipeUnreadable(recipe.clone()))?,
    };
    let fields = rpkg_recipe::extract(&bytes, lines_to_parse).or_raise(|| ErrorKind::Recipe(recipe))?;
    Ok(Package::from_fields(name, overlay, &fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpkg_recipe::DEFAULT_LINES_TO_PARSE;
    use std::fs as sync_fs;
    use tempfile::TempDir;

    fn write_package(root: &Path, name: &str, recipe: &[u8]) {
        let dir = root.join(name);
        sync_fs::create_dir_all(&dir).unwrap();
        sync_fs::write(dir.join(RECIPE_FILENAME), recipe).unwrap();
    }

    #[tokio::test]
    async fn test_build() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "cups-xerox", b"pkgver=1.2.3\npkgrel=4\npkgdesc=\"Xerox drivers\"\n");
        write_package(tmp.path(), "legacy", b"pkgver=0.9\npkgdesc=\"Caf\xe9\"\n");
        write_package(tmp.path(), "versionless", b"pkgrel=1\n");
        sync_fs::create_dir_all(tmp.path().join("no-recipe")).unwrap();
        sync_fs::create_dir_all(tmp.path().join(".git")).unwrap();
        sync_fs::write(tmp.path().join("README"), "not a package").unwrap();

        let overlay = Overlay::build("main", tmp.path(), DEFAULT_LINES_TO_PARSE).await;
        assert_eq!(overlay.name, "main");
        assert_eq!(overlay.packages.keys().collect::<Vec<_>>(), ["cups-xerox", "legacy", "versionless"]);

        let cups = overlay.get("cups-xerox").unwrap();
        assert_eq!(cups.version.as_deref(), Some("1.2.3-4"));
        assert_eq!(cups.description.as_deref(), Some("Xerox drivers"));
        assert_eq!(cups.overlay, "main");
        assert_eq!(overlay.get("legacy").unwrap().description.as_deref(), Some("Café"));
        assert_eq!(overlay.get("versionless").unwrap().version, None);
    }

    #[tokio::test]
    async fn test_build_missing_overlay() {
        let tmp = TempDir::new().unwrap();
        let overlay = Overlay::build("gone", tmp.path().join("gone"), DEFAULT_LINES_TO_PARSE).await;
        assert!(overlay.is_empty());
        assert_eq!(overlay.name, "gone");
    }

    #[tokio::test]
    async fn test_build_overlay_is_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file");
        sync_fs::write(&file, "nope").unwrap();
        assert!(Overlay::build("file", &file, DEFAULT_LINES_TO_PARSE).await.is_empty());
    }

    #[tokio::test]
    async fn test_read_package_missing_recipe() {
        let tmp = TempDir::new().unwrap();
        let err = read_package(tmp.path(), "pkg", "main", DEFAULT_LINES_TO_PARSE).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::RecipeNotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_build_follows_symlinked_package() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        write_package(elsewhere.path(), "linked", b"pkgver=3\n");
        std::os::unix::fs::symlink(elsewhere.path().join("linked"), tmp.path().join("linked")).unwrap();
        let overlay = Overlay::build("main", tmp.path(), DEFAULT_LINES_TO_PARSE).await;
        assert_eq!(overlay.get("linked").unwrap().version.as_deref(), Some("3"));
    }
}
