//! Process-wide cache of built overlay indexes.

use std::collections::HashMap;
use std::sync::Arc;

use rpkg_recipe::DEFAULT_LINES_TO_PARSE;
use rpkg_storage::Overlays;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::Overlay;

type Slot = Arc<Mutex<Option<Arc<Overlay>>>>;

/// Lazily-built, explicitly-invalidated overlay indexes.
///
/// Each overlay name gets its own slot behind its own lock. The lock is held
/// for the whole of a build, so concurrent first requests for one overlay
/// wait for a single scan instead of racing duplicate scans, while requests
/// for other overlays are unaffected. [`invalidate`](Self::invalidate) takes
/// the same lock, so clearing and filling a slot never interleave.
#[derive(Debug)]
pub struct IndexCache {
    overlays: Overlays,
    lines_to_parse: usize,
    slots: Mutex<HashMap<String, Slot>>,
}
impl IndexCache {
    pub fn new(overlays: Overlays) -> Self {
        Self::with_lines_to_parse(overlays, DEFAULT_LINES_TO_PARSE)
    }

    pub fn with_lines_to_parse(overlays: Overlays, lines_to_parse: usize) -> Self {
        Self { overlays, lines_to_parse, slots: Mutex::new(HashMap::new()) }
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    async fn slot(&self, name: &str) -> Slot {
        self.slots.lock().await.entry(name.to_string()).or_default().clone()
    }

    /// Returns the cached index for `name`, scanning the overlay directory
    /// first if there isn't one.
    ///
    /// Names that aren't a single path component are never scanned or
    /// cached; they get an empty index.
    ///
    /// Any other name gets a slot, and an empty index when no such overlay
    /// exists. Slots are never evicted, so the cache grows with every
    /// distinct overlay name requested until the process restarts.
    #[instrument(skip(self))]
    pub async fn get_or_build(&self, name: &str) -> Arc<Overlay> {
        let path = match self.overlays.overlay_dir(name) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(error = ?err, "Refusing to index overlay");
                return Arc::new(Overlay::empty(name));
            },
        };
        let slot = self.slot(name).await;
        let mut guard = slot.lock().await;
        if let Some(overlay) = guard.as_ref() {
            return overlay.clone();
        }
        let overlay = Arc::new(Overlay::build(name, &path, self.lines_to_parse).await);
        *guard = Some(overlay.clone());
        overlay
    }

    /// Drops the cached index for `name`, if any, so the next query rescans
    /// the overlay. Waits for an in-progress build of the same overlay to
    /// finish first. Returns `true` if an index was dropped.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, name: &str) -> bool {
        let Some(slot) = self.slots.lock().await.get(name).cloned() else {
            return false;
        };
        let dropped = slot.lock().await.take().is_some();
        if dropped {
            tracing::info!(overlay = name, "Overlay index reset");
        }
        dropped
    }

    /// Whether an index for `name` is currently cached. Blocks behind an
    /// in-progress build of that overlay.
    pub async fn is_cached(&self, name: &str) -> bool {
        let Some(slot) = self.slots.lock().await.get(name).cloned() else {
            return false;
        };
        slot.lock().await.is_some()
    }
}
