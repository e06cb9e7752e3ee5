//! Ordered map from identifier to cache entry.
//!
//! The store is only ever reachable through the cache's mutex guard, so
//! holding a `&Store`/`&mut Store` is proof that the lock is held.

use crate::cache::entry::CacheEntry;
use std::collections::btree_map::{self, BTreeMap};
use std::ops::Bound;

/// Cache entries keyed by identifier
#[derive(Debug, Default)]
pub struct Store {
    entries: BTreeMap<String, CacheEntry>,
}

impl Store {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `name`
    pub fn get(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }

    /// Mutable entry for `name`
    pub fn get_mut(&mut self, name: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(name)
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(&mut self, name: String, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(name, entry)
    }

    /// Remove and return the entry for `name`
    pub fn remove(&mut self, name: &str) -> Option<CacheEntry> {
        self.entries.remove(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in identifier order
    pub fn iter(&self) -> btree_map::Iter<'_, String, CacheEntry> {
        self.entries.iter()
    }

    /// Entries strictly after `name`, or all entries when `name` is `None`
    pub fn iter_after(&self, name: Option<&str>) -> btree_map::Range<'_, String, CacheEntry> {
        match name {
            Some(name) => self
                .entries
                .range::<str, _>((Bound::Excluded(name), Bound::Unbounded)),
            None => self.entries.range::<str, _>(..),
        }
    }
}
