//! In-process metric value cache.
//!
//! Every sample dispatched by an input plugin passes through
//! [`ValueCache::update`]; consumers read back the latest raw values,
//! computed rates, short-term history, state and meta data.
//!
//! One mutex guards the whole store. Regular operations hold it for a single
//! lookup or mutation; [`CacheIter`] and [`ValueCache::with_meta`] hold it
//! for their whole duration. Events are dispatched only after the lock has
//! been released.

pub mod arithmetic;
pub mod entry;
pub mod events;
pub mod iter;
pub mod meta_bridge;
pub mod query;
pub mod ring_buffer;
pub mod store;
pub mod sweeper;
pub mod update;

pub use entry::CacheEntry;
pub use events::{CacheEvent, CacheEventKind, CacheObserver, MissingValue};
pub use iter::{CacheIter, EntrySnapshot};
pub use ring_buffer::HistoryBuffer;
pub use store::Store;
pub use sweeper::{spawn_sweeper, SweeperHandle};
pub use update::UpdateOutcome;

use crate::core::config::CacheConfig;
use crate::core::identity::ValueIdentity;
use crate::core::Result;
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

static GLOBAL: OnceCell<Arc<ValueCache>> = OnceCell::new();

/// Anything that names a cache entry: an identifier string or the five
/// identifying fields.
pub trait CacheKey {
    /// Identifier string, truncated to `max_len` bytes when built from fields
    fn cache_name(&self, max_len: usize) -> Cow<'_, str>;
}

impl CacheKey for str {
    fn cache_name(&self, _max_len: usize) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl CacheKey for String {
    fn cache_name(&self, _max_len: usize) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl CacheKey for ValueIdentity {
    fn cache_name(&self, max_len: usize) -> Cow<'_, str> {
        Cow::Owned(self.name(max_len))
    }
}

/// The metric value cache
pub struct ValueCache {
    store: Mutex<Store>,
    config: CacheConfig,
    observers: RwLock<Vec<Arc<dyn CacheObserver>>>,
}

impl ValueCache {
    /// Create an empty cache, rejecting an invalid `config`
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: CacheConfig) -> Self {
        Self {
            store: Mutex::new(Store::new()),
            config,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Create an empty cache behind an `Arc`
    pub fn shared(config: CacheConfig) -> Result<Arc<Self>> {
        Self::new(config).map(Arc::new)
    }

    /// Initialise the process-wide cache.
    ///
    /// Idempotent: once a cache exists, later calls return it and ignore
    /// `config`.
    pub fn init_global(config: CacheConfig) -> Result<Arc<Self>> {
        GLOBAL
            .get_or_try_init(|| {
                tracing::debug!("Initialising process-wide value cache");
                Self::shared(config)
            })
            .map(Arc::clone)
    }

    /// The process-wide cache, if `init_global` has run
    pub fn global() -> Option<Arc<Self>> {
        GLOBAL.get().cloned()
    }

    /// Settings the cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Register a consumer of cache events
    pub fn subscribe(&self, observer: Arc<dyn CacheObserver>) {
        self.observers.write().push(observer);
    }

    /// Number of entries, including `Missing` ones
    pub fn size(&self) -> usize {
        self.store.lock().len()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock()
    }

    pub(crate) fn name_of<'k, K: CacheKey + ?Sized>(&self, key: &'k K) -> Cow<'k, str> {
        key.cache_name(self.config.max_identifier_len)
    }

    /// Snapshot of the observer list so dispatch never holds a lock
    pub(crate) fn observers(&self) -> Vec<Arc<dyn CacheObserver>> {
        self.observers.read().clone()
    }

    pub(crate) fn dispatch_event(&self, event: &CacheEvent<'_>) {
        for observer in self.observers() {
            observer.cache_event(event);
        }
    }
}

impl Default for ValueCache {
    fn default() -> Self {
        Self::with_valid_config(CacheConfig::default())
    }
}

impl fmt::Debug for ValueCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCache")
            .field("config", &self.config)
            .field("observers", &self.observers.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CacheError;
    use std::time::Duration;

    #[test]
    fn test_cache_key_forms() {
        let cache = ValueCache::default();
        let id = ValueIdentity::new("h", "p", "t").type_instance("x");
        assert_eq!(cache.name_of(&id), "h/p/t-x");
        assert_eq!(cache.name_of("h/p/t-x"), "h/p/t-x");
        assert_eq!(cache.name_of(&"h/p/t-x".to_string()), "h/p/t-x");
    }

    #[test]
    fn test_init_global_is_idempotent() {
        let first = ValueCache::init_global(CacheConfig::default()).unwrap();
        let second = ValueCache::init_global(CacheConfig {
            timeout_multiplier: 9,
            ..CacheConfig::default()
        })
        .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &ValueCache::global().unwrap()));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let zero_multiplier = ValueCache::new(CacheConfig {
            timeout_multiplier: 0,
            ..CacheConfig::default()
        });
        assert!(matches!(zero_multiplier, Err(CacheError::Config(_))));

        let zero_sweep = ValueCache::shared(CacheConfig {
            sweep_interval: Duration::ZERO,
            ..CacheConfig::default()
        });
        assert!(matches!(zero_sweep, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_empty_cache() {
        let cache = ValueCache::default();
        assert_eq!(cache.size(), 0);
        assert!(format!("{:?}", cache).contains("ValueCache"));
    }
}
