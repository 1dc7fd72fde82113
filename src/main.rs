//! `rpkg`: an AUR-compatible RPC index and package server for overlays of
//! `PKGBUILD` directories.
//!
//! ```bash
//! rpkg
//! rpkg --listen 0.0.0.0:8080 --overlays /srv/overlays -v
//! rpkg --config /etc/rpkg.toml
//! ```

mod error;
mod server;

use std::path::PathBuf;

use clap::Parser;
use exn::ResultExt;
use rpkg_config::{Config, Overrides};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{ErrorKind, Result};

#[derive(Parser, Debug)]
#[command(name = "rpkg", version)]
#[command(about = "AUR-compatible RPC index and package server for PKGBUILD overlays")]
struct Args {
    /// Configuration file (defaults to `rpkg.toml` in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory holding the overlay checkouts
    #[arg(short, long)]
    overlays: Option<PathBuf>,

    /// Log more (`-v` debug, `-vv` trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}
impl Args {
    fn level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::WARN,
            (false, 0) => LevelFilter::INFO,
            (false, 1) => LevelFilter::DEBUG,
            (false, _) => LevelFilter::TRACE,
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides { listen: self.listen.clone(), overlays: self.overlays.clone() }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().with_default_directive(args.level().into()).from_env_lossy())
        .init();

    let cwd = std::env::current_dir().map_err(ErrorKind::Io)?;
    let config = Config::load(&cwd, args.config.as_deref(), &args.overrides()).or_raise(|| ErrorKind::Config)?;
    server::run(config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["rpkg"], LevelFilter::INFO)]
    #[case(&["rpkg", "-q"], LevelFilter::WARN)]
    #[case(&["rpkg", "-v"], LevelFilter::DEBUG)]
    #[case(&["rpkg", "-vvv"], LevelFilter::TRACE)]
    fn test_verbosity(#[case] argv: &[&str], #[case] expected: LevelFilter) {
        assert_eq!(Args::parse_from(argv).level(), expected);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["rpkg", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from(["rpkg", "--listen", "0.0.0.0:80", "-o", "/srv/overlays"]);
        let overrides = args.overrides();
        assert_eq!(overrides.listen.as_deref(), Some("0.0.0.0:80"));
        assert_eq!(overrides.overlays, Some(PathBuf::from("/srv/overlays")));
        assert!(Args::parse_from(["rpkg"]).overrides().listen.is_none());
    }
}
