//! Line-oriented extraction of recipe declarations.

use tracing::instrument;

use crate::models::{Field, Fields};

impl Fields {
    /// Scans the first `lines_to_parse` lines for the recognised declarations.
    ///
    /// The first declaration of a field wins; repeats are logged and ignored.
    /// Nothing past the bound is read, so a `pkgver=` rewritten at the bottom
    /// of the file by a VCS package's `pkgver()` run is never picked up.
    #[instrument(level = "trace", skip(lines))]
    pub fn extract<'a>(lines: impl IntoIterator<Item = &'a str>, lines_to_parse: usize) -> Self {
        let mut fields = Fields::new();
        for line in lines.into_iter().take(lines_to_parse) {
            for field in Field::ALL {
                let Some(value) = field.capture(line) else {
                    continue;
                };
                if !fields.set_once(field, value) {
                    tracing::debug!(%field, value, "field declared again; keeping first value");
                }
            }
        }
        tracing::trace!(?fields, "recipe fields extracted");
        fields
    }
}
