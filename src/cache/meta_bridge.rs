//! Per-entry meta data access.
//!
//! Each operation runs one closure against the entry's [`MetaData`] while
//! the store is locked; the container is created on first use.

use crate::cache::{CacheKey, ValueCache};
use crate::core::{CacheError, Result};
use crate::meta::{MetaData, MetaValue};

macro_rules! meta_add {
    ($name:ident, $method:ident, $ty:ty) => {
        #[doc = concat!("Store a `", stringify!($ty), "` under `meta_key`")]
        pub fn $name<K: CacheKey + ?Sized>(&self, key: &K, meta_key: &str, value: $ty) -> Result<()> {
            self.with_meta(key, |meta| meta.$method(meta_key, value))
        }
    };
}

macro_rules! meta_get {
    ($name:ident, $method:ident, $ty:ty) => {
        #[doc = concat!("Read the `", stringify!($ty), "` stored under `meta_key`")]
        pub fn $name<K: CacheKey + ?Sized>(&self, key: &K, meta_key: &str) -> Result<$ty> {
            self.with_meta(key, |meta| meta.$method(meta_key))?
        }
    };
}

impl ValueCache {
    /// Run `f` on the meta data of a series with the store locked.
    ///
    /// `f` must not call back into the cache.
    pub fn with_meta<K, F, R>(&self, key: &K, f: F) -> Result<R>
    where
        K: CacheKey + ?Sized,
        F: FnOnce(&mut MetaData) -> R,
    {
        let name = self.name_of(key);
        let mut store = self.lock();
        let entry = store
            .get_mut(&name)
            .ok_or_else(|| CacheError::not_found(name.to_string()))?;
        Ok(f(entry.meta_mut()))
    }

    /// True if the series has a value under `meta_key`
    pub fn meta_exists<K: CacheKey + ?Sized>(&self, key: &K, meta_key: &str) -> Result<bool> {
        self.with_meta(key, |meta| meta.exists(meta_key))
    }

    /// Remove `meta_key` from the series
    pub fn meta_delete<K: CacheKey + ?Sized>(&self, key: &K, meta_key: &str) -> Result<()> {
        self.with_meta(key, |meta| meta.delete(meta_key))?
    }

    /// Meta data keys of a series in insertion order
    pub fn meta_toc<K: CacheKey + ?Sized>(&self, key: &K) -> Result<Vec<String>> {
        self.with_meta(key, |meta| meta.toc())
    }

    /// Type name of the value stored under `meta_key`, if any
    pub fn meta_value_type<K: CacheKey + ?Sized>(&self, key: &K, meta_key: &str) -> Result<Option<&'static str>> {
        self.with_meta(key, |meta| meta.value_type(meta_key))
    }

    /// Store `value` under `meta_key`, replacing any previous value
    pub fn meta_add<K: CacheKey + ?Sized>(&self, key: &K, meta_key: &str, value: MetaValue) -> Result<()> {
        self.with_meta(key, |meta| meta.add(meta_key, value))
    }

    /// Read the value stored under `meta_key`
    pub fn meta_get<K: CacheKey + ?Sized>(&self, key: &K, meta_key: &str) -> Result<MetaValue> {
        self.with_meta(key, |meta| meta.get(meta_key))?
    }

    meta_add!(meta_add_string, add_string, String);
    meta_add!(meta_add_signed_int, add_signed_int, i64);
    meta_add!(meta_add_unsigned_int, add_unsigned_int, u64);
    meta_add!(meta_add_double, add_double, f64);
    meta_add!(meta_add_boolean, add_boolean, bool);

    meta_get!(meta_get_string, get_string, String);
    meta_get!(meta_get_signed_int, get_signed_int, i64);
    meta_get!(meta_get_unsigned_int, get_unsigned_int, u64);
    meta_get!(meta_get_double, get_double, f64);
    meta_get!(meta_get_boolean, get_boolean, bool);
}
