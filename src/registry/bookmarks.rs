//! Bookmarked stations
//!
//! A deduplicated list of starred stations persisted under the `stations`
//! key. Bookmarks keep their own copy of the station name so the list stays
//! displayable when the live station list is unavailable.
//!
//! This is the one key that follows writes from other running instances:
//! call [`BookmarkRegistry::sync_from_store`] periodically.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;

use crate::prefs::PreferenceStore;

pub const BOOKMARKS_KEY: &str = "stations";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkedStation {
    pub id: String,
    pub name: String,
}

impl BookmarkedStation {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub struct BookmarkRegistry {
    store: Rc<PreferenceStore>,
    entries: Vec<BookmarkedStation>,
    /// Store revision our in-memory copy corresponds to
    seen_revision: u64,
}

impl BookmarkRegistry {
    pub fn load(store: Rc<PreferenceStore>) -> Self {
        let entries = dedupe(store.read(BOOKMARKS_KEY, Vec::new()));
        let seen_revision = store.revision(BOOKMARKS_KEY);
        Self {
            store,
            entries,
            seen_revision,
        }
    }

    pub fn list(&self) -> &[BookmarkedStation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|s| s.id == id)
    }

    /// Insert unless the id is already bookmarked. Returns whether it was added.
    pub fn add(&mut self, station: BookmarkedStation) -> bool {
        if self.contains(&station.id) {
            return false;
        }
        self.entries.push(station);
        self.persist();
        true
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Flip the bookmark state of a station and return the new state
    pub fn toggle(&mut self, station: BookmarkedStation) -> bool {
        let id = station.id.clone();
        if self.contains(&id) {
            self.remove(&id);
        } else {
            self.add(station);
        }
        self.contains(&id)
    }

    /// Reload if another instance wrote the list since we last saw it
    pub fn sync_from_store(&mut self) -> bool {
        let revision = self.store.revision(BOOKMARKS_KEY);
        if revision == self.seen_revision {
            return false;
        }

        let entries = dedupe(self.store.read(BOOKMARKS_KEY, Vec::new()));
        self.seen_revision = revision;
        if entries == self.entries {
            return false;
        }

        tracing::debug!(
            "Bookmarks changed by another instance: {} -> {} entries",
            self.entries.len(),
            entries.len()
        );
        self.entries = entries;
        true
    }

    fn persist(&mut self) {
        // Only our own write counts as seen; later writes by others must sync
        if let Some(revision) = self.store.write(BOOKMARKS_KEY, &self.entries) {
            self.seen_revision = revision;
        }
    }
}

/// Keep the first entry for each id
fn dedupe(entries: Vec<BookmarkedStation>) -> Vec<BookmarkedStation> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BookmarkRegistry {
        BookmarkRegistry::load(Rc::new(PreferenceStore::new_in_memory().unwrap()))
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut bookmarks = registry();
        assert!(bookmarks.add(BookmarkedStation::new("C01503", "Oulu")));
        assert!(!bookmarks.add(BookmarkedStation::new("C01503", "Oulu again")));
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks.list()[0].name, "Oulu");
    }

    #[test]
    fn test_add_then_remove_restores_state() {
        let mut bookmarks = registry();
        bookmarks.add(BookmarkedStation::new("A", "a"));
        let before = bookmarks.list().to_vec();

        bookmarks.add(BookmarkedStation::new("B", "b"));
        bookmarks.remove("B");
        assert_eq!(bookmarks.list(), before.as_slice());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut bookmarks = registry();
        bookmarks.add(BookmarkedStation::new("A", "a"));
        assert!(!bookmarks.remove("Z"));
        assert_eq!(bookmarks.len(), 1);
    }

    #[test]
    fn test_toggle_reports_new_state() {
        let mut bookmarks = registry();
        assert!(bookmarks.toggle(BookmarkedStation::new("A", "a")));
        assert!(bookmarks.contains("A"));
        bookmarks.add(BookmarkedStation::new("B", "b"));
        assert!(!bookmarks.toggle(BookmarkedStation::new("A", "a")));
        assert!(!bookmarks.contains("A"));
        assert!(bookmarks.contains("B"));
    }

    #[test]
    fn test_clear() {
        let mut bookmarks = registry();
        bookmarks.add(BookmarkedStation::new("A", "a"));
        bookmarks.add(BookmarkedStation::new("B", "b"));
        bookmarks.clear();
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_duplicate_ids_dropped_on_load() {
        let store = Rc::new(PreferenceStore::new_in_memory().unwrap());
        store.write(
            BOOKMARKS_KEY,
            &vec![
                BookmarkedStation::new("A", "first"),
                BookmarkedStation::new("A", "second"),
            ],
        );
        let bookmarks = BookmarkRegistry::load(store);
        assert_eq!(bookmarks.list(), &[BookmarkedStation::new("A", "first")]);
    }

    #[test]
    fn test_sync_ignores_own_writes() {
        let mut bookmarks = registry();
        bookmarks.add(BookmarkedStation::new("A", "a"));
        assert!(!bookmarks.sync_from_store());
    }
}
