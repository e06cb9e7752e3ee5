//! Update/insert engine.

use crate::cache::entry::CacheEntry;
use crate::cache::events::{CacheEvent, CacheEventKind};
use crate::cache::ValueCache;
use crate::core::types::{DataSet, Sample};
use crate::core::{CacheError, Result};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// What an accepted sample did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// First sample of the series; a new entry was created
    Inserted,
    /// An existing entry was advanced
    Updated,
}

impl ValueCache {
    /// Feed one sample into the cache.
    ///
    /// A new series is inserted with NaN rates (gauges excepted) and
    /// announced with a `New` event. A known series has its rates computed
    /// against the previous raw values; an `Update` event follows if the
    /// entry's callbacks mask is non-zero. Rejected samples leave the entry
    /// untouched.
    pub fn update(&self, ds: &DataSet, sample: &Sample) -> Result<UpdateOutcome> {
        let name = self.name_of(&sample.identity).into_owned();

        let result = self.apply_sample(&name, ds, sample);
        match &result {
            Ok(UpdateOutcome::Inserted) => debug!("Inserted new cache entry {}", name),
            Ok(UpdateOutcome::Updated) => {}
            Err(e @ CacheError::OutOfOrder { .. }) => info!("{}", e),
            Err(e) => error!("Cache update of {} failed: {}", name, e),
        }
        result
    }

    fn apply_sample(&self, name: &str, ds: &DataSet, sample: &Sample) -> Result<UpdateOutcome> {
        validate(name, ds, sample)?;

        let interval = self.effective_interval(sample.interval);
        let now = Instant::now();

        let (outcome, mask) = {
            let mut store = self.lock();
            match store.get_mut(name) {
                Some(entry) => {
                    if entry.values_num() != ds.len() {
                        return Err(CacheError::ColumnMismatch {
                            name: name.to_string(),
                            expected: ds.len(),
                            actual: entry.values_num(),
                        });
                    }
                    let rates = entry.compute_rates(name, ds, sample)?;
                    entry.apply(sample, rates, interval, now);
                    (UpdateOutcome::Updated, entry.callbacks_mask)
                }
                None => {
                    let entry = CacheEntry::from_sample(ds, sample, interval, now);
                    store.insert(name.to_string(), entry);
                    (UpdateOutcome::Inserted, 0)
                }
            }
        };

        let kind = match outcome {
            UpdateOutcome::Inserted => CacheEventKind::New,
            UpdateOutcome::Updated if mask != 0 => CacheEventKind::Update,
            UpdateOutcome::Updated => return Ok(outcome),
        };
        self.dispatch_event(&CacheEvent {
            kind,
            mask,
            name,
            identity: &sample.identity,
            time: sample.time,
            interval,
            values: &sample.values,
        });

        Ok(outcome)
    }

    fn effective_interval(&self, interval: Duration) -> Duration {
        if interval.is_zero() {
            self.config.default_interval
        } else {
            interval
        }
    }
}

/// Checks a sample against its data set before the store is touched
fn validate(name: &str, ds: &DataSet, sample: &Sample) -> Result<()> {
    if sample.values.len() != ds.len() {
        return Err(CacheError::ColumnMismatch {
            name: name.to_string(),
            expected: ds.len(),
            actual: sample.values.len(),
        });
    }

    for (column, (value, source)) in sample.values.iter().zip(&ds.sources).enumerate() {
        if value.kind() != source.kind {
            return Err(CacheError::UnsupportedKind {
                name: name.to_string(),
                column,
                expected: source.kind,
                actual: value.kind(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::events::CacheObserver;
    use crate::core::config::CacheConfig;
    use crate::core::identity::ValueIdentity;
    use crate::core::types::{DataSource, RawValue, ValueKind};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Default)]
    struct Recorder {
        kinds: Mutex<Vec<CacheEventKind>>,
    }

    impl CacheObserver for Recorder {
        fn cache_event(&self, event: &CacheEvent<'_>) {
            self.kinds.lock().push(event.kind);
        }
    }

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn sample(secs: u64, value: RawValue) -> Sample {
        Sample::builder()
            .identity(ValueIdentity::new("host", "cpu", "value"))
            .time(at(secs))
            .interval(Duration::from_secs(10))
            .value(value)
            .build()
            .unwrap()
    }

    fn ds(kind: ValueKind) -> DataSet {
        DataSet::new("value", vec![DataSource::new("value", kind)])
    }

    #[test]
    fn test_counter_insert_then_update() {
        let cache = ValueCache::default();
        let ds = ds(ValueKind::Counter);

        assert_eq!(cache.update(&ds, &sample(100, RawValue::Counter(1000))).unwrap(), UpdateOutcome::Inserted);
        assert!(cache.get_rate("host/cpu/value").unwrap()[0].is_nan());

        assert_eq!(cache.update(&ds, &sample(110, RawValue::Counter(1500))).unwrap(), UpdateOutcome::Updated);
        assert_eq!(cache.get_rate("host/cpu/value").unwrap(), vec![50.0]);
    }

    #[test]
    fn test_out_of_order_leaves_entry_alone() {
        let cache = ValueCache::default();
        let ds = ds(ValueKind::Gauge);
        cache.update(&ds, &sample(100, RawValue::Gauge(1.0))).unwrap();

        let err = cache.update(&ds, &sample(100, RawValue::Gauge(2.0))).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(cache.get_raw("host/cpu/value").unwrap(), vec![RawValue::Gauge(1.0)]);
    }

    #[test]
    fn test_kind_mismatch_is_rejected_before_insert() {
        let cache = ValueCache::default();
        let err = cache
            .update(&ds(ValueKind::Counter), &sample(100, RawValue::Gauge(1.0)))
            .unwrap_err();
        assert!(matches!(err, CacheError::UnsupportedKind { column: 0, .. }));
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_column_count_mismatch() {
        let cache = ValueCache::default();
        let two = DataSet::new(
            "value",
            vec![
                DataSource::new("rx", ValueKind::Gauge),
                DataSource::new("tx", ValueKind::Gauge),
            ],
        );
        let err = cache.update(&two, &sample(100, RawValue::Gauge(1.0))).unwrap_err();
        assert!(matches!(err, CacheError::ColumnMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_events_follow_mask() {
        let cache = ValueCache::default();
        let recorder = Arc::new(Recorder::default());
        cache.subscribe(recorder.clone());
        let ds = ds(ValueKind::Gauge);

        cache.update(&ds, &sample(100, RawValue::Gauge(1.0))).unwrap();
        cache.update(&ds, &sample(110, RawValue::Gauge(2.0))).unwrap();
        assert_eq!(*recorder.kinds.lock(), vec![CacheEventKind::New]);

        cache.set_callbacks_mask("host/cpu/value", 0b10).unwrap();
        cache.update(&ds, &sample(120, RawValue::Gauge(3.0))).unwrap();
        assert_eq!(*recorder.kinds.lock(), vec![CacheEventKind::New, CacheEventKind::Update]);
    }

    #[test]
    fn test_zero_interval_uses_default() {
        let cache = ValueCache::new(CacheConfig {
            default_interval: Duration::from_secs(30),
            ..CacheConfig::default()
        })
        .unwrap();
        let ds = ds(ValueKind::Gauge);
        let sample = Sample::builder()
            .identity(ValueIdentity::new("host", "cpu", "value"))
            .time(at(100))
            .value(RawValue::Gauge(1.0))
            .build()
            .unwrap();
        cache.update(&ds, &sample).unwrap();

        let snapshot = cache.snapshot();
        assert_eq!(snapshot[0].interval, Duration::from_secs(30));
        assert_eq!(cache.effective_interval(Duration::from_secs(5)), Duration::from_secs(5));
    }
}
