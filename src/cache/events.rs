//! Notifications sent from the cache to its consumers.
//!
//! Events are always dispatched with the store lock released, so observers
//! may call back into the cache.

use crate::core::identity::ValueIdentity;
use crate::core::types::RawValue;
use std::time::{Duration, SystemTime};

/// Kind of cache event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEventKind {
    /// First sample of a series; sent regardless of the callbacks mask
    New,
    /// Accepted sample for a series with a non-zero callbacks mask
    Update,
    /// Series evicted by the sweeper while its callbacks mask was non-zero
    Expired,
}

/// A cache event as seen by an observer
#[derive(Debug, Clone)]
pub struct CacheEvent<'a> {
    /// What happened
    pub kind: CacheEventKind,
    /// Callbacks mask of the entry; zero for `New`
    pub mask: u64,
    /// Identifier string of the series
    pub name: &'a str,
    /// Identifying fields of the series
    pub identity: &'a ValueIdentity,
    /// Time of the sample, or of the last one for `Expired`
    pub time: SystemTime,
    /// Collection interval of the series
    pub interval: Duration,
    /// Raw values of the sample; empty for `Expired`
    pub values: &'a [RawValue],
}

/// A series that stopped reporting
#[derive(Debug, Clone, PartialEq)]
pub struct MissingValue {
    /// Identifier string of the evicted series
    pub name: String,
    /// Fields reconstructed from `name`
    pub identity: ValueIdentity,
    /// Time of the last accepted sample
    pub time: SystemTime,
    /// Collection interval of the series
    pub interval: Duration,
}

/// Consumer of cache notifications (threshold checks, exporters, ...)
pub trait CacheObserver: Send + Sync {
    /// Called for `New`, `Update` and `Expired` events
    fn cache_event(&self, event: &CacheEvent<'_>);

    /// Called once for every evicted series
    fn missing(&self, _value: &MissingValue) {}
}
