//! Read and bookkeeping accessors.
//!
//! Every call locks the store for one lookup or mutation and returns owned
//! copies. Absent identifiers are reported as `None` rather than errors,
//! except where the caller explicitly asked to modify an entry.

use crate::cache::{CacheEntry, CacheKey, ValueCache};
use crate::core::types::{DataSet, RawValue, State};
use crate::core::{CacheError, Result};
use std::time::SystemTime;
use tracing::{debug, error};

impl ValueCache {
    /// Latest rates, or `None` if the series is absent or `Missing`
    pub fn get_rate<K: CacheKey + ?Sized>(&self, key: &K) -> Option<Vec<f64>> {
        let name = self.name_of(key);
        let store = self.lock();
        match store.get(&name) {
            Some(entry) if entry.state != State::Missing => Some(entry.rate.clone()),
            Some(_) => None,
            None => {
                debug!("No such value: {}", name);
                None
            }
        }
    }

    /// Latest rates, checked against the column layout of `ds`
    pub fn get_rate_for<K: CacheKey + ?Sized>(&self, ds: &DataSet, key: &K) -> Option<Vec<f64>> {
        let rates = self.get_rate(key)?;
        if rates.len() != ds.len() {
            error!(
                "{} has {} values, but data set {} declares {}",
                self.name_of(key),
                rates.len(),
                ds.type_name,
                ds.len()
            );
            return None;
        }
        Some(rates)
    }

    /// Latest raw values, or `None` if the series is absent or `Missing`
    pub fn get_raw<K: CacheKey + ?Sized>(&self, key: &K) -> Option<Vec<RawValue>> {
        let name = self.name_of(key);
        let store = self.lock();
        store
            .get(&name)
            .filter(|entry| entry.state != State::Missing)
            .map(|entry| entry.raw.clone())
    }

    /// Time and raw values of the first sample stored for the series.
    ///
    /// Restarted whenever a counter column goes backwards.
    pub fn first_metric<K: CacheKey + ?Sized>(&self, key: &K) -> Option<(SystemTime, Vec<RawValue>)> {
        let name = self.name_of(key);
        let store = self.lock();
        store
            .get(&name)
            .map(|entry| (entry.first_time, entry.first_values.clone()))
    }

    /// Threshold state; `State::Error` if the series is absent
    pub fn get_state<K: CacheKey + ?Sized>(&self, key: &K) -> State {
        let name = self.name_of(key);
        self.lock()
            .get(&name)
            .map_or(State::Error, |entry| entry.state)
    }

    /// Replace the state, returning the previous one
    pub fn set_state<K: CacheKey + ?Sized>(&self, key: &K, state: State) -> Option<State> {
        let name = self.name_of(key);
        let mut store = self.lock();
        store
            .get_mut(&name)
            .map(|entry| std::mem::replace(&mut entry.state, state))
    }

    /// Hit counter of a series, or `None` if it is absent
    pub fn get_hits<K: CacheKey + ?Sized>(&self, key: &K) -> Option<i64> {
        let name = self.name_of(key);
        self.lock().get(&name).map(|entry| entry.hits)
    }

    /// Replace the hit counter, returning the previous value
    pub fn set_hits<K: CacheKey + ?Sized>(&self, key: &K, hits: i64) -> Option<i64> {
        let name = self.name_of(key);
        let mut store = self.lock();
        store
            .get_mut(&name)
            .map(|entry| std::mem::replace(&mut entry.hits, hits))
    }

    /// Add `step` to the hit counter, returning the previous value
    pub fn inc_hits<K: CacheKey + ?Sized>(&self, key: &K, step: i64) -> Option<i64> {
        let name = self.name_of(key);
        let mut store = self.lock();
        store.get_mut(&name).map(|entry| {
            let previous = entry.hits;
            entry.hits = previous.wrapping_add(step);
            previous
        })
    }

    /// Identifier and last sample time of every series not in `Missing` state
    pub fn get_names(&self) -> Vec<(String, SystemTime)> {
        let store = self.lock();
        store
            .iter()
            .filter(|(_, entry)| entry.state != State::Missing)
            .map(|(name, entry)| (name.clone(), entry.last_time))
            .collect()
    }

    /// Set which consumers receive `Update`/`Expired` events for a series
    pub fn set_callbacks_mask<K: CacheKey + ?Sized>(&self, key: &K, mask: u64) -> Result<()> {
        let name = self.name_of(key);
        let mut store = self.lock();
        let entry = store
            .get_mut(&name)
            .ok_or_else(|| CacheError::not_found(name.to_string()))?;
        entry.callbacks_mask = mask;
        Ok(())
    }

    /// The `steps` most recent rate vectors, newest first.
    ///
    /// The first call for a series materialises its history buffer; until
    /// enough updates have been recorded the missing steps read as NaN.
    pub fn get_history<K: CacheKey + ?Sized>(&self, key: &K, steps: usize) -> Result<Vec<Vec<f64>>> {
        if steps == 0 {
            return Ok(Vec::new());
        }

        let name = self.name_of(key);
        let mut store = self.lock();
        let entry = store
            .get_mut(&name)
            .ok_or_else(|| CacheError::not_found(name.to_string()))?;

        read_history(entry, steps)
    }

    /// Like `get_history`, checked against the column layout of `ds`
    pub fn get_history_for<K: CacheKey + ?Sized>(
        &self,
        ds: &DataSet,
        key: &K,
        steps: usize,
    ) -> Result<Vec<Vec<f64>>> {
        let name = self.name_of(key);
        let mut store = self.lock();
        let entry = store
            .get_mut(&name)
            .ok_or_else(|| CacheError::not_found(name.to_string()))?;
        if entry.values_num() != ds.len() {
            let err = CacheError::ColumnMismatch {
                name: name.to_string(),
                expected: ds.len(),
                actual: entry.values_num(),
            };
            error!("{}", err);
            return Err(err);
        }
        if steps == 0 {
            return Ok(Vec::new());
        }

        read_history(entry, steps)
    }
}

fn read_history(entry: &mut CacheEntry, steps: usize) -> Result<Vec<Vec<f64>>> {
    let history = entry.history_mut();
    history.ensure_capacity(steps)?;
    Ok(history.read(steps))
}
