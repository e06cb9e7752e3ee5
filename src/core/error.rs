//! Error types for cache operations.

use crate::core::types::ValueKind;
use std::time::SystemTime;
use thiserror::Error;

/// Errors reported by the value cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// Sample is not newer than the cached one
    #[error("Value too old: name = {name}; value time = {value_time:?}; last cache update = {last_time:?}")]
    OutOfOrder {
        /// Series identifier
        name: String,
        /// Time carried by the rejected sample
        value_time: SystemTime,
        /// Time of the cached sample
        last_time: SystemTime,
    },

    /// Raw value kind differs from its data-source kind
    #[error("Don't know how to handle {actual:?} value in column {column} of {name} (data source is {expected:?})")]
    UnsupportedKind {
        /// Series identifier
        name: String,
        /// Offending column index
        column: usize,
        /// Kind declared by the data set
        expected: ValueKind,
        /// Kind carried by the sample
        actual: ValueKind,
    },

    /// Column count differs from the data set
    #[error("{name} has {actual} values, but the data set declares {expected}")]
    ColumnMismatch {
        /// Series identifier
        name: String,
        /// Columns declared by the data set
        expected: usize,
        /// Columns present
        actual: usize,
    },

    /// Series is not cached
    #[error("No such value: {0}")]
    NotFound(String),

    /// Identifier string cannot be parsed
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Meta data key is absent
    #[error("Meta data key not found: {0}")]
    MetaKeyNotFound(String),

    /// Meta data value has another type
    #[error("Type mismatch for meta data key `{key}': expected {expected}, found {actual}")]
    MetaTypeMismatch {
        /// Meta data key
        key: String,
        /// Requested type
        expected: &'static str,
        /// Stored type
        actual: &'static str,
    },

    /// History buffer could not grow
    #[error("Allocation failed: {0}")]
    Allocation(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

impl CacheError {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new not-found error
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::NotFound(name.into())
    }

    /// Creates a new identifier error
    pub fn invalid_identifier<S: Into<String>>(msg: S) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    /// Creates a new allocation error
    pub fn allocation<S: Into<String>>(msg: S) -> Self {
        Self::Allocation(msg.into())
    }

    /// Returns true if the sample was rejected without touching the cache.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::OutOfOrder { .. } | Self::UnsupportedKind { .. })
    }

    /// Returns true if retrying later can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Allocation(_))
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfOrder { .. } | Self::UnsupportedKind { .. } => "rejected",
            Self::ColumnMismatch { .. } | Self::InvalidIdentifier(_) => "validation",
            Self::NotFound(_) | Self::MetaKeyNotFound(_) => "not_found",
            Self::MetaTypeMismatch { .. } => "meta",
            Self::Allocation(_) => "resource",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_error_creation() {
        let err = CacheError::config("timeout_multiplier must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Configuration error: timeout_multiplier must be greater than 0"
        );
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_rejections() {
        let err = CacheError::OutOfOrder {
            name: "host/cpu-0/cpu-idle".to_string(),
            value_time: UNIX_EPOCH + Duration::from_secs(15),
            last_time: UNIX_EPOCH + Duration::from_secs(20),
        };
        assert!(err.is_rejection());
        assert_eq!(err.category(), "rejected");

        let err = CacheError::UnsupportedKind {
            name: "host/load/load".to_string(),
            column: 1,
            expected: ValueKind::Gauge,
            actual: ValueKind::Counter,
        };
        assert!(err.is_rejection());
        assert!(!CacheError::not_found("x").is_rejection());
    }

    #[test]
    fn test_error_recoverability() {
        assert!(CacheError::allocation("history").is_recoverable());
        assert!(!CacheError::config("invalid").is_recoverable());
    }
}
