//! Consistent views over the whole cache.
//!
//! [`CacheIter`] keeps the store locked for its whole lifetime. Every other
//! cache call, including a second `iter()` on the same thread, blocks until
//! it is dropped, so only one iterator may be open at a time and it must not
//! call back into the cache. [`ValueCache::snapshot`] copies everything under
//! one short lock instead.

use crate::cache::entry::CacheEntry;
use crate::cache::store::Store;
use crate::cache::ValueCache;
use crate::core::types::{RawValue, State};
use crate::meta::MetaData;
use parking_lot::MutexGuard;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    Start,
    At(String),
    End,
}

/// Lock-holding cursor over all non-`Missing` entries in identifier order
pub struct CacheIter<'a> {
    guard: MutexGuard<'a, Store>,
    cursor: Cursor,
}

impl<'a> CacheIter<'a> {
    fn current(&self) -> Option<&CacheEntry> {
        match &self.cursor {
            Cursor::At(name) => self.guard.get(name),
            Cursor::Start | Cursor::End => None,
        }
    }

    /// Identifier of the current entry
    pub fn name(&self) -> Option<&str> {
        match &self.cursor {
            Cursor::At(name) => Some(name),
            Cursor::Start | Cursor::End => None,
        }
    }

    /// Time of the current entry's last accepted sample
    pub fn time(&self) -> Option<SystemTime> {
        self.current().map(|entry| entry.last_time)
    }

    /// Copy of the current entry's raw values
    pub fn values(&self) -> Option<Vec<RawValue>> {
        self.current().map(|entry| entry.raw.clone())
    }

    /// Collection interval of the current entry
    pub fn interval(&self) -> Option<Duration> {
        self.current().map(|entry| entry.interval)
    }

    /// Copy of the current entry's meta data, if it has any
    pub fn meta(&self) -> Option<MetaData> {
        self.current().and_then(|entry| entry.meta.clone())
    }

    /// Release the lock
    pub fn close(self) {}
}

impl Iterator for CacheIter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let after = match &self.cursor {
            Cursor::Start => None,
            Cursor::At(name) => Some(name.as_str()),
            Cursor::End => return None,
        };

        let next = self
            .guard
            .iter_after(after)
            .find(|(_, entry)| entry.state != State::Missing)
            .map(|(name, _)| name.clone());

        self.cursor = match &next {
            Some(name) => Cursor::At(name.clone()),
            None => Cursor::End,
        };
        next
    }
}

/// Owned copy of one entry, as returned by [`ValueCache::snapshot`]
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySnapshot {
    /// Identifier string
    pub name: String,
    /// Time of the last accepted sample
    pub time: SystemTime,
    /// Collection interval
    pub interval: Duration,
    /// Latest raw values
    pub values: Vec<RawValue>,
    /// Latest rates
    pub rates: Vec<f64>,
    /// Assigned state
    pub state: State,
    /// Meta data, if any
    pub meta: Option<MetaData>,
}

impl ValueCache {
    /// Open a lock-holding iterator.
    ///
    /// Blocks all other cache access until the iterator is closed or dropped.
    pub fn iter(&self) -> CacheIter<'_> {
        CacheIter {
            guard: self.lock(),
            cursor: Cursor::Start,
        }
    }

    /// Copy every non-`Missing` entry under one short lock
    pub fn snapshot(&self) -> Vec<EntrySnapshot> {
        let store = self.lock();
        store
            .iter()
            .filter(|(_, entry)| entry.state != State::Missing)
            .map(|(name, entry)| EntrySnapshot {
                name: name.clone(),
                time: entry.last_time,
                interval: entry.interval,
                values: entry.raw.clone(),
                rates: entry.rate.clone(),
                state: entry.state,
                meta: entry.meta.clone(),
            })
            .collect()
    }
}
