//! Common test utilities and fixtures.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use valcache_lib::cache::{CacheEvent, CacheEventKind, CacheObserver, MissingValue};
use valcache_lib::core::{DataSet, DataSource, RawValue, Sample, ValueIdentity, ValueKind};

/// Seconds since the epoch as a sample time
pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Single-column data set of the given kind
pub fn single(type_name: &str, kind: ValueKind) -> DataSet {
    DataSet::new(type_name, vec![DataSource::new("value", kind)])
}

/// Test fixture builder for samples with sensible defaults.
pub struct TestSampleBuilder {
    host: String,
    plugin: String,
    type_: String,
    type_instance: String,
    time: SystemTime,
    interval: Duration,
    values: Vec<RawValue>,
}

impl TestSampleBuilder {
    pub fn new(type_: &str) -> Self {
        Self {
            host: "test-host".to_string(),
            plugin: "test".to_string(),
            type_: type_.to_string(),
            type_instance: String::new(),
            time: at(10),
            interval: Duration::from_secs(10),
            values: Vec::new(),
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn type_instance(mut self, instance: &str) -> Self {
        self.type_instance = instance.to_string();
        self
    }

    pub fn at(mut self, secs: u64) -> Self {
        self.time = at(secs);
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn value(mut self, value: RawValue) -> Self {
        self.values.push(value);
        self
    }

    pub fn identity(&self) -> ValueIdentity {
        ValueIdentity::new(self.host.clone(), self.plugin.clone(), self.type_.clone())
            .type_instance(self.type_instance.clone())
    }

    pub fn build(self) -> Sample {
        Sample::builder()
            .identity(self.identity())
            .time(self.time)
            .interval(self.interval)
            .values(self.values)
            .build()
            .unwrap()
    }
}

/// Observer that records everything it is told
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<(CacheEventKind, String)>>,
    pub missing: Mutex<Vec<MissingValue>>,
}

impl CacheObserver for RecordingObserver {
    fn cache_event(&self, event: &CacheEvent<'_>) {
        self.events.lock().push((event.kind, event.name.to_string()));
    }

    fn missing(&self, value: &MissingValue) {
        self.missing.lock().push(value.clone());
    }
}
