//! Valcache - in-process metric value cache for telemetry daemons.
//!
//! Every value list an input plugin dispatches is fed through the cache,
//! which keeps the latest raw values per series, turns counters, derives
//! and absolutes into per-second rates, and lets consumers read them back.
//!
//! # Features
//!
//! - **Rates**: wrap-aware counter arithmetic, range clamping to NaN
//! - **History**: per-series ring buffer, materialised on first request
//! - **Timeouts**: two-phase sweeper evicting series that stopped reporting
//! - **Notifications**: observers for new, updated, missing and expired series
//! - **Meta data**: typed key/value store attached to every entry
//!
//! # Architecture
//!
//! - `core`: configuration, errors, logging and domain types
//! - `cache`: the store, update engine, accessors, iterator and sweeper
//! - `meta`: the per-entry meta data container
//!
//! # Example
//!
//! ```no_run
//! use valcache_lib::cache::ValueCache;
//! use valcache_lib::core::{CacheConfig, DataSet, DataSource, RawValue, Sample, ValueIdentity, ValueKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = ValueCache::new(CacheConfig::default())?;
//!     let ds = DataSet::new("if_octets", vec![
//!         DataSource::new("rx", ValueKind::Derive),
//!         DataSource::new("tx", ValueKind::Derive),
//!     ]);
//!     let sample = Sample::builder()
//!         .identity(ValueIdentity::new("localhost", "interface", "if_octets").plugin_instance("eth0"))
//!         .values(vec![RawValue::Derive(1200), RawValue::Derive(800)])
//!         .build()?;
//!
//!     cache.update(&ds, &sample)?;
//!     let rates = cache.get_rate("localhost/interface-eth0/if_octets");
//!     println!("{:?}", rates);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cache;
pub mod core;
pub mod meta;

// Re-export core types for convenience
pub use crate::cache::{CacheKey, UpdateOutcome, ValueCache};
pub use crate::core::{CacheError, Config, Result};
pub use crate::meta::{MetaData, MetaValue};
