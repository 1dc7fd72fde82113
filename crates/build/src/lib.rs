//! Invocation of the external build tool.
//!
//! Packages are built by a `makepkg` wrapper that, after a successful source
//! build, prints a marker line followed by a JSON report:
//!
//! ```text
//! ==> Making package: cups-xerox 1.2.3-4
//! ...
//! JsonDone
//! {"file": "/srv/overlays/main/cups-xerox/cups-xerox-1.2.3-4.src.tar.gz"}
//! ```
//!
//! Only the report is interpreted; what the tool does to produce the archive
//! is its own business.

pub mod error;
mod makepkg;
mod report;

pub use crate::makepkg::Makepkg;
pub use crate::report::{MARKER, Report};
