//! Short-lived cache in front of note reads.
//!
//! Uses `moka::sync::Cache` so entries expire after a fixed TTL and the
//! cache never grows past its capacity. Each [`NoteStore`](super::store::NoteStore)
//! builds its own instance; nothing is shared between stores.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::domain::NoteEntry;

/// Default time-to-live for cached reads.
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);
/// Default maximum number of cached note bodies.
pub const DEFAULT_CAPACITY: u64 = 1024;
/// Listings are few (one per directory/extension pair).
const LISTING_CAPACITY: u64 = 64;

/// Listing cache key: resolved directory plus extension filter.
pub type ListingKey = (PathBuf, String);

#[derive(Clone)]
pub struct NoteCache {
    /// Resolved note path → file content
    notes: Cache<PathBuf, String>,

    /// (directory, extension) → listing
    listings: Cache<ListingKey, Arc<Vec<NoteEntry>>>,

    ttl: Duration,
}

impl NoteCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self {
            notes: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(capacity)
                .build(),
            listings: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(LISTING_CAPACITY)
                .build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // ── Note bodies ─────────────────────────────────────────

    pub fn get_note(&self, path: &Path) -> Option<String> {
        self.notes.get(path)
    }

    pub fn set_note(&self, path: PathBuf, content: String) {
        self.notes.insert(path, content);
    }

    pub fn invalidate_note(&self, path: &Path) {
        self.notes.invalidate(path);
    }

    // ── Listings ────────────────────────────────────────────

    pub fn get_listing(&self, key: &ListingKey) -> Option<Arc<Vec<NoteEntry>>> {
        self.listings.get(key)
    }

    pub fn set_listing(&self, key: ListingKey, entries: Arc<Vec<NoteEntry>>) {
        self.listings.insert(key, entries);
    }

    /// Drops every cached listing. Any write may add or remove a file from
    /// some listed directory, so listings are invalidated as a group.
    pub fn invalidate_listing(&self) {
        self.listings.invalidate_all();
    }

    /// Number of cached note bodies after pending evictions are applied.
    pub fn note_count(&self) -> u64 {
        self.notes.run_pending_tasks();
        self.notes.entry_count()
    }
}

impl Default for NoteCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}
