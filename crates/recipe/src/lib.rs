//! Metadata extraction from `PKGBUILD` recipes.
//!
//! A `PKGBUILD` is a bash script, and evaluating one needs a shell. The AUR
//! (and `makepkg` itself, for the static declarations) instead reads the
//! handful of `key=value` lines at the top of the file. This crate does the
//! same: it decodes the recipe, scans a bounded prefix of lines for the
//! fields in [`Field`](models::Field), and derives the full package version.
//!
//! ```
//! use rpkg_recipe::extract;
//!
//! let recipe = "pkgname=foo\nepoch=1\npkgver=2.0\npkgrel=3\npkgdesc=\"Foo tools\"\n";
//! let fields = extract(recipe, 20).unwrap();
//! assert_eq!(fields.version().as_deref(), Some("1:2.0-3"));
//! assert_eq!(fields.description().as_deref(), Some("Foo tools"));
//! ```

mod consts;
mod decode;
pub mod error;
mod extract;
pub mod models;

use tracing::instrument;

pub use crate::consts::DEFAULT_LINES_TO_PARSE;
pub use crate::decode::Encoding;
use crate::error::Result;
use crate::models::Fields;

/// Easy, top-level entrypoint: decode raw recipe bytes and extract the fields
/// declared in the first `lines_to_parse` lines.
#[instrument(skip(recipe), fields(recipe_size = recipe.as_ref().len()))]
pub fn extract(recipe: impl AsRef<[u8]>, lines_to_parse: usize) -> Result<Fields> {
    let (encoding, text) = Encoding::decode_any(recipe.as_ref())?;
    tracing::trace!(%encoding, "recipe decoded");
    Ok(Fields::extract(text.lines(), lines_to_parse))
}
