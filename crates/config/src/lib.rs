//! Configuration for the overlay index server.
//!
//! Values are layered with [`figment`], later layers winning:
//!
//! 1. Defaults anchored in the working directory (see [`Config::defaults`]).
//! 2. An optional TOML file, `rpkg.toml` in the working directory unless a
//!    path is given explicitly.
//! 3. Command-line overrides.
//!
//! ```toml
//! listen = "0.0.0.0:8080"
//! prefix = "/aur"
//! overlays = "/srv/overlays"
//! makepkg = "makepkg/makepkg"
//! static_dir = "static"
//! lines_to_parse = 20
//! ```
//!
//! Relative paths are resolved against the working directory.

pub mod error;

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// File name looked up in the working directory when no config path is given.
pub const DEFAULT_FILENAME: &str = "rpkg.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen: String,
    /// Path prefix all routes are mounted under; empty to mount at `/`.
    pub prefix: String,
    /// Directory holding one checkout per overlay.
    pub overlays: PathBuf,
    /// The `makepkg` wrapper that builds packages and reports the archive.
    pub makepkg: PathBuf,
    /// Directory served under `{prefix}/static/`.
    pub static_dir: PathBuf,
    /// Number of leading `PKGBUILD` lines scanned for metadata.
    pub lines_to_parse: usize,
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlays: Option<PathBuf>,
}

impl Config {
    /// Built-in defaults, anchored at `cwd`.
    pub fn defaults(cwd: impl AsRef<Path>) -> Self {
        let cwd = cwd.as_ref();
        Self {
            listen: "localhost:8080".to_string(),
            prefix: "/aur".to_string(),
            overlays: cwd.join("overlays"),
            makepkg: cwd.join("makepkg").join("makepkg"),
            static_dir: cwd.join("static"),
            lines_to_parse: rpkg_recipe::DEFAULT_LINES_TO_PARSE,
        }
    }

    /// Loads the configuration for a server started in `cwd`.
    ///
    /// A missing default config file is fine; a missing explicitly given one
    /// is an error.
    #[instrument(skip(overrides))]
    pub fn load(cwd: &Path, file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::defaults(cwd)));
        match file {
            Some(file) => {
                let file = cwd.join(file);
                if !file.is_file() {
                    exn::bail!(ErrorKind::Load(format!("config file not found: {}", file.display())));
                }
                figment = figment.merge(Toml::file(file));
            },
            None => figment = figment.merge(Toml::file(cwd.join(DEFAULT_FILENAME))),
        }
        let config: Self = figment
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|e| ErrorKind::Load(e.to_string()))?;
        let config = config.resolve(cwd);
        config.validate()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    fn resolve(self, cwd: &Path) -> Self {
        Self {
            overlays: cwd.join(self.overlays),
            makepkg: cwd.join(self.makepkg),
            static_dir: cwd.join(self.static_dir),
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.prefix.is_empty() && (!self.prefix.starts_with('/') || self.prefix.ends_with('/')) {
            exn::bail!(ErrorKind::Invalid {
                field: "prefix",
                reason: "must start with '/' and must not end with '/'",
            });
        }
        if self.lines_to_parse == 0 {
            exn::bail!(ErrorKind::Invalid { field: "lines_to_parse", reason: "must be at least 1" });
        }
        if self.listen.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid { field: "listen", reason: "must not be empty" });
        }
        Ok(())
    }
}
