//! Core domain models, configuration and error types.
//!
//! This module contains the fundamental types shared by the cache and
//! its consumers.

pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::{CacheConfig, Config, ConfigBuilder, LogLevel, LoggingConfig};
pub use error::{CacheError, Result};
pub use identity::{ValueIdentity, MAX_IDENTIFIER_LEN};
pub use logging::init_logging;
pub use types::{DataSet, DataSource, RawValue, Sample, SampleBuilder, State, ValueKind};
