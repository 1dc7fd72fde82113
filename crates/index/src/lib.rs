//! In-memory index of PKGBUILD overlays, and the AUR RPC engine that
//! answers queries against it.
//!
//! - [`Package`]: one indexed package and its RPC projection.
//! - [`Overlay`]: every package of one overlay, built by scanning its
//!   directory.
//! - [`IndexCache`]: built overlays, kept until explicitly invalidated.
//! - [`QueryEngine`]: `info`, `multiinfo` and `search`.
//!
//! The index is rebuilt from disk whenever it is invalidated; nothing is
//! persisted.

mod cache;
pub mod error;
mod overlay;
mod package;
pub mod query;

pub use crate::cache::IndexCache;
pub use crate::overlay::Overlay;
pub use crate::package::{NUM_VOTES, Package, ProtocolRecord};
pub use crate::query::{Query, QueryEngine, QueryType, Response, Results};
