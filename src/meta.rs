//! Typed key/value meta data attached to samples and cache entries.
//!
//! Keys are compared case-insensitively. Entries keep insertion order and
//! re-adding a key replaces its value in place.

use crate::core::error::{CacheError, Result};
use serde::{Deserialize, Serialize};

/// A single meta data value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaValue {
    /// Text
    String(String),
    /// Signed integer
    SignedInt(i64),
    /// Unsigned integer
    UnsignedInt(u64),
    /// Floating point number
    Double(f64),
    /// Flag
    Boolean(bool),
}

impl MetaValue {
    /// Name of the stored type, used in mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            MetaValue::String(_) => "string",
            MetaValue::SignedInt(_) => "signed_int",
            MetaValue::UnsignedInt(_) => "unsigned_int",
            MetaValue::Double(_) => "double",
            MetaValue::Boolean(_) => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MetaEntry {
    key: String,
    value: MetaValue,
}

/// Ordered, case-insensitive meta data container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    entries: Vec<MetaEntry>,
}

macro_rules! typed_get {
    ($name:ident, $variant:ident, $ty:ty, $label:literal) => {
        #[doc = concat!("Returns the ", $label, " stored under `key`.")]
        pub fn $name(&self, key: &str) -> Result<$ty> {
            match self.lookup(key)? {
                MetaValue::$variant(v) => Ok(v.clone()),
                other => Err(CacheError::MetaTypeMismatch {
                    key: key.to_string(),
                    expected: $label,
                    actual: other.type_name(),
                }),
            }
        }
    };
}

impl MetaData {
    /// Empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.key.eq_ignore_ascii_case(key))
    }

    fn lookup(&self, key: &str) -> Result<&MetaValue> {
        self.position(key)
            .map(|i| &self.entries[i].value)
            .ok_or_else(|| CacheError::MetaKeyNotFound(key.to_string()))
    }

    /// True if `key` is stored, ignoring case
    pub fn exists(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Type of the value stored under `key`, if any
    pub fn value_type(&self, key: &str) -> Option<&'static str> {
        self.lookup(key).ok().map(MetaValue::type_name)
    }

    /// Keys in insertion order
    pub fn toc(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    /// Removes `key`, failing if it is absent
    pub fn delete(&mut self, key: &str) -> Result<()> {
        let idx = self
            .position(key)
            .ok_or_else(|| CacheError::MetaKeyNotFound(key.to_string()))?;
        self.entries.remove(idx);
        Ok(())
    }

    /// Stores `value` under `key`, replacing any previous value
    pub fn add(&mut self, key: &str, value: MetaValue) {
        match self.position(key) {
            Some(idx) => self.entries[idx].value = value,
            None => self.entries.push(MetaEntry {
                key: key.to_string(),
                value,
            }),
        }
    }

    /// Stores a string
    pub fn add_string<S: Into<String>>(&mut self, key: &str, value: S) {
        self.add(key, MetaValue::String(value.into()));
    }

    /// Stores a signed integer
    pub fn add_signed_int(&mut self, key: &str, value: i64) {
        self.add(key, MetaValue::SignedInt(value));
    }

    /// Stores an unsigned integer
    pub fn add_unsigned_int(&mut self, key: &str, value: u64) {
        self.add(key, MetaValue::UnsignedInt(value));
    }

    /// Stores a floating point number
    pub fn add_double(&mut self, key: &str, value: f64) {
        self.add(key, MetaValue::Double(value));
    }

    /// Stores a flag
    pub fn add_boolean(&mut self, key: &str, value: bool) {
        self.add(key, MetaValue::Boolean(value));
    }

    /// Returns a copy of the value stored under `key`
    pub fn get(&self, key: &str) -> Result<MetaValue> {
        self.lookup(key).cloned()
    }

    typed_get!(get_string, String, String, "string");
    typed_get!(get_signed_int, SignedInt, i64, "signed_int");
    typed_get!(get_unsigned_int, UnsignedInt, u64, "unsigned_int");
    typed_get!(get_double, Double, f64, "double");
    typed_get!(get_boolean, Boolean, bool, "boolean");

    /// Copies every entry of `other` into `self`, overwriting equal keys
    pub fn merge_from(&mut self, other: &MetaData) {
        for entry in &other.entries {
            self.add(&entry.key, entry.value.clone());
        }
    }
}
