//! Domain types: value kinds, data sets, samples and entry states.

use crate::core::error::{CacheError, Result};
use crate::core::identity::ValueIdentity;
use crate::meta::MetaData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

/// Semantic type of a data-source column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Unsigned, monotonic, wraps at 32 or 64 bits
    Counter,
    /// Instantaneous reading, stored as is
    Gauge,
    /// Signed, may decrease when the producer resets
    Derive,
    /// Events since the last read
    Absolute,
}

impl ValueKind {
    /// Returns the lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Counter => "counter",
            ValueKind::Gauge => "gauge",
            ValueKind::Derive => "derive",
            ValueKind::Absolute => "absolute",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw sample value tagged with its kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawValue {
    /// Monotonic counter reading
    Counter(u64),
    /// Instantaneous reading
    Gauge(f64),
    /// Signed running total
    Derive(i64),
    /// Count since the previous read
    Absolute(u64),
}

impl RawValue {
    /// Returns the kind carried by this value
    pub fn kind(&self) -> ValueKind {
        match self {
            RawValue::Counter(_) => ValueKind::Counter,
            RawValue::Gauge(_) => ValueKind::Gauge,
            RawValue::Derive(_) => ValueKind::Derive,
            RawValue::Absolute(_) => ValueKind::Absolute,
        }
    }

    /// Lossy conversion to a floating value
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match *self {
            RawValue::Counter(v) | RawValue::Absolute(v) => v as f64,
            RawValue::Gauge(v) => v,
            RawValue::Derive(v) => v as f64,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Counter(v) | RawValue::Absolute(v) => write!(f, "{}", v),
            RawValue::Gauge(v) => write!(f, "{}", v),
            RawValue::Derive(v) => write!(f, "{}", v),
        }
    }
}

fn unbounded() -> f64 {
    f64::NAN
}

/// One column of a data set: kind plus the accepted rate range.
///
/// `NaN` for `min` or `max` means the side is unbounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    /// Column name
    pub name: String,
    /// How raw values of this column turn into rates
    pub kind: ValueKind,
    /// Lowest accepted rate
    #[serde(default = "unbounded")]
    pub min: f64,
    /// Highest accepted rate
    #[serde(default = "unbounded")]
    pub max: f64,
}

impl DataSource {
    /// Creates an unbounded data source
    pub fn new<S: Into<String>>(name: S, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            min: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Sets the accepted range
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Returns true if `rate` lies outside `[min, max]`.
    ///
    /// NaN rates are never out of range, NaN bounds never reject.
    pub fn out_of_range(&self, rate: f64) -> bool {
        if rate.is_nan() {
            return false;
        }
        (!self.min.is_nan() && rate < self.min) || (!self.max.is_nan() && rate > self.max)
    }
}

/// Column layout of a metric type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSet {
    /// Metric type this layout belongs to
    pub type_name: String,
    /// Columns, in sample order
    pub sources: Vec<DataSource>,
}

impl DataSet {
    /// Creates a data set from its columns
    pub fn new<S: Into<String>>(type_name: S, sources: Vec<DataSource>) -> Self {
        Self {
            type_name: type_name.into(),
            sources,
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when the data set has no columns
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Lifecycle state of a cache entry.
///
/// The cache only ever creates entries as `Unknown`; every other state is
/// assigned by callers through `set_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// No state assigned yet
    #[default]
    Unknown,
    /// Within thresholds
    Okay,
    /// Warning threshold crossed
    Warning,
    /// Error threshold crossed, or the series is absent
    Error,
    /// Hidden from reads until evicted
    Missing,
}

/// A value list pushed by an input plugin
#[derive(Debug, Clone)]
pub struct Sample {
    /// Series the sample belongs to
    pub identity: ValueIdentity,
    /// Time carried by the sample itself
    pub time: SystemTime,
    /// Expected collection interval; zero means "use the configured default"
    pub interval: Duration,
    /// One raw value per data-source column
    pub values: Vec<RawValue>,
    /// Meta data attached by the producer
    pub meta: Option<MetaData>,
}

impl Sample {
    /// Creates a new sample builder
    pub fn builder() -> SampleBuilder {
        SampleBuilder::default()
    }
}

/// Builder for creating Sample instances
#[derive(Default)]
pub struct SampleBuilder {
    identity: Option<ValueIdentity>,
    time: Option<SystemTime>,
    interval: Duration,
    values: Vec<RawValue>,
    meta: Option<MetaData>,
}

impl SampleBuilder {
    /// Sets the series identity (required)
    pub fn identity(mut self, identity: ValueIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Sets the sample time; defaults to now
    pub fn time(mut self, time: SystemTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sets the collection interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Appends one column value
    pub fn value(mut self, value: RawValue) -> Self {
        self.values.push(value);
        self
    }

    /// Replaces all column values
    pub fn values(mut self, values: Vec<RawValue>) -> Self {
        self.values = values;
        self
    }

    /// Attaches meta data
    pub fn meta(mut self, meta: MetaData) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Builds the sample, failing without an identity
    pub fn build(self) -> Result<Sample> {
        Ok(Sample {
            identity: self
                .identity
                .ok_or_else(|| CacheError::invalid_identifier("identity is required"))?,
            time: self.time.unwrap_or_else(SystemTime::now),
            interval: self.interval,
            values: self.values,
            meta: self.meta,
        })
    }
}
