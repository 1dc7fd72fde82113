use regex::Regex;
use std::sync::LazyLock;

/// Number of leading lines scanned for declarations. `makepkg` and the AUR
/// both expect the static `pkgver=`/`pkgrel=` lines near the top of the file;
/// anything rewritten further down by a `pkgver()` run is not revisited.
pub const DEFAULT_LINES_TO_PARSE: usize = 20;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// "Version tags may not include hyphens! Letters, numbers, and periods only"
regex!(PKGVER_REGEX, r"^pkgver=([a-zA-Z0-9.]+)");
regex!(PKGREL_REGEX, r"^pkgrel=([a-zA-Z0-9.]+)");
regex!(EPOCH_REGEX, r"^epoch=([0-9]+)");
regex!(PKGDESC_REGEX, r"^pkgdesc=(.+)");
