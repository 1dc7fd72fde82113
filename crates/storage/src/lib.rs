//! On-disk layout of the overlays root.
//!
//! The overlays root holds one directory per overlay, each a git checkout
//! containing one directory per package with a `PKGBUILD` inside:
//!
//! ```text
//! overlays/
//! └── {overlay}/
//!     ├── .git/
//!     └── {package}/
//!         └── PKGBUILD
//! ```
//!
//! Every name arriving from a request is checked to be a single path
//! component before it is joined onto the root, and every path reported back
//! by an external tool is checked to still live under the root before it is
//! served.

pub mod error;
mod git;
mod overlays;
mod path;

pub use crate::git::Git;
pub use crate::overlays::{Overlays, RECIPE_FILENAME};
pub use crate::path::{contain as contain_path, validate as validate_path, validate_component};
