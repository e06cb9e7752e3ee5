//! Per-identifier cache record.

use crate::cache::arithmetic;
use crate::cache::ring_buffer::HistoryBuffer;
use crate::core::types::{DataSet, RawValue, Sample, State};
use crate::core::{CacheError, Result};
use crate::meta::MetaData;
use std::time::{Duration, Instant, SystemTime};

/// Cached state of one metric series
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Fixed for the lifetime of the entry
    values_num: usize,
    pub(crate) raw: Vec<RawValue>,
    pub(crate) rate: Vec<f64>,
    /// First sample ever seen
    pub(crate) first_time: SystemTime,
    pub(crate) first_values: Vec<RawValue>,
    /// Time carried by the last accepted sample (for rates)
    pub(crate) last_time: SystemTime,
    /// Local clock at the last accepted sample (for eviction)
    pub(crate) last_update: Instant,
    pub(crate) interval: Duration,
    pub(crate) state: State,
    pub(crate) hits: i64,
    pub(crate) history: Option<HistoryBuffer>,
    pub(crate) meta: Option<MetaData>,
    pub(crate) callbacks_mask: u64,
}

impl CacheEntry {
    /// Build an entry from the first sample of a series.
    ///
    /// The sample must already be validated against `ds`.
    pub(crate) fn from_sample(ds: &DataSet, sample: &Sample, interval: Duration, now: Instant) -> Self {
        let mut rate: Vec<f64> = sample.values.iter().map(arithmetic::initial_rate).collect();
        arithmetic::check_range(ds, &mut rate);

        Self {
            values_num: sample.values.len(),
            raw: sample.values.clone(),
            rate,
            first_time: sample.time,
            first_values: sample.values.clone(),
            last_time: sample.time,
            last_update: now,
            interval,
            state: State::Unknown,
            hits: 0,
            history: None,
            meta: sample.meta.clone(),
            callbacks_mask: 0,
        }
    }

    /// Number of columns
    pub fn values_num(&self) -> usize {
        self.values_num
    }

    /// Compute the rates for `sample` without touching the entry.
    ///
    /// Both the column count and every column kind are checked before any
    /// rate is produced, so a rejected sample leaves no trace.
    pub(crate) fn compute_rates(&self, name: &str, ds: &DataSet, sample: &Sample) -> Result<Vec<f64>> {
        if sample.time <= self.last_time {
            return Err(CacheError::OutOfOrder {
                name: name.to_string(),
                value_time: sample.time,
                last_time: self.last_time,
            });
        }

        let elapsed = sample
            .time
            .duration_since(self.last_time)
            .unwrap_or_default()
            .as_secs_f64();

        let mut rates = Vec::with_capacity(self.values_num);
        for (column, (old, new)) in self.raw.iter().zip(&sample.values).enumerate() {
            let rate = arithmetic::rate(old, new, elapsed).ok_or_else(|| CacheError::UnsupportedKind {
                name: name.to_string(),
                column,
                expected: old.kind(),
                actual: new.kind(),
            })?;
            rates.push(rate);
        }
        arithmetic::check_range(ds, &mut rates);
        Ok(rates)
    }

    /// Commit a sample whose rates were produced by `compute_rates`.
    ///
    /// A counter that went backwards restarts the first sample, which is how
    /// resets and wraps are signalled through `first_metric`.
    pub(crate) fn apply(&mut self, sample: &Sample, rates: Vec<f64>, interval: Duration, now: Instant) {
        if counter_went_backwards(&self.raw, &sample.values) {
            self.first_time = sample.time;
            self.first_values.copy_from_slice(&sample.values);
        }

        self.raw.copy_from_slice(&sample.values);
        self.rate = rates;

        if let Some(history) = self.history.as_mut() {
            history.push(&self.rate);
        }

        self.last_time = sample.time;
        self.last_update = now;
        self.interval = interval;
    }

    /// Returns true if the entry has not been updated for
    /// `interval * timeout_multiplier`.
    pub(crate) fn is_expired(&self, now: Instant, timeout_multiplier: u32) -> bool {
        now.saturating_duration_since(self.last_update)
            >= self.interval.saturating_mul(timeout_multiplier)
    }

    /// History buffer, created on first use
    pub(crate) fn history_mut(&mut self) -> &mut HistoryBuffer {
        let values_num = self.values_num;
        self.history
            .get_or_insert_with(|| HistoryBuffer::new(values_num))
    }

    /// Meta data container, created on first use
    pub(crate) fn meta_mut(&mut self) -> &mut MetaData {
        self.meta.get_or_insert_with(MetaData::new)
    }
}

fn counter_went_backwards(old: &[RawValue], new: &[RawValue]) -> bool {
    old.iter().zip(new).any(|pair| match pair {
        (RawValue::Counter(old), RawValue::Counter(new)) => new < old,
        _ => false,
    })
}
