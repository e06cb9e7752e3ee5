//! Metric series identity and its string form.
//!
//! An identifier has the form `host/plugin[-plugin_instance]/type[-type_instance]`.
//! Empty instances are omitted together with their separator.

use crate::core::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Room for six 128-byte name fields, minus the terminator.
pub const MAX_IDENTIFIER_LEN: usize = 6 * 128 - 1;

/// The five fields naming a metric series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ValueIdentity {
    /// Host the value was collected on
    pub host: String,
    /// Collecting plugin
    pub plugin: String,
    /// Optional plugin instance, such as an interface name
    #[serde(default)]
    pub plugin_instance: String,
    /// Metric type, naming the data set
    #[serde(rename = "type")]
    pub type_: String,
    /// Optional type instance
    #[serde(default)]
    pub type_instance: String,
}

impl ValueIdentity {
    /// Identity with empty instances
    pub fn new<H, P, T>(host: H, plugin: P, type_: T) -> Self
    where
        H: Into<String>,
        P: Into<String>,
        T: Into<String>,
    {
        Self {
            host: host.into(),
            plugin: plugin.into(),
            plugin_instance: String::new(),
            type_: type_.into(),
            type_instance: String::new(),
        }
    }

    /// Sets the plugin instance
    pub fn plugin_instance<S: Into<String>>(mut self, instance: S) -> Self {
        self.plugin_instance = instance.into();
        self
    }

    /// Sets the type instance
    pub fn type_instance<S: Into<String>>(mut self, instance: S) -> Self {
        self.type_instance = instance.into();
        self
    }

    /// Builds the identifier string, truncated to at most `max_len` bytes.
    pub fn name(&self, max_len: usize) -> String {
        let mut name = String::with_capacity(
            self.host.len()
                + self.plugin.len()
                + self.plugin_instance.len()
                + self.type_.len()
                + self.type_instance.len()
                + 4,
        );
        name.push_str(&self.host);
        name.push('/');
        name.push_str(&self.plugin);
        if !self.plugin_instance.is_empty() {
            name.push('-');
            name.push_str(&self.plugin_instance);
        }
        name.push('/');
        name.push_str(&self.type_);
        if !self.type_instance.is_empty() {
            name.push('-');
            name.push_str(&self.type_instance);
        }

        if name.len() > max_len {
            let mut cut = max_len;
            while !name.is_char_boundary(cut) {
                cut -= 1;
            }
            name.truncate(cut);
        }
        name
    }

    /// Reconstructs the fields from an identifier string.
    ///
    /// The first `-` of the plugin and type parts starts the instance, so
    /// plugin and type names containing `-` do not round-trip.
    pub fn parse(name: &str) -> Result<Self> {
        let (host, rest) = name
            .split_once('/')
            .ok_or_else(|| CacheError::invalid_identifier(format!("missing host in \"{}\"", name)))?;
        let (plugin, type_) = rest
            .split_once('/')
            .ok_or_else(|| CacheError::invalid_identifier(format!("missing type in \"{}\"", name)))?;

        let (plugin, plugin_instance) = plugin.split_once('-').unwrap_or((plugin, ""));
        let (type_, type_instance) = type_.split_once('-').unwrap_or((type_, ""));

        Ok(Self {
            host: host.to_string(),
            plugin: plugin.to_string(),
            plugin_instance: plugin_instance.to_string(),
            type_: type_.to_string(),
            type_instance: type_instance.to_string(),
        })
    }
}

impl fmt::Display for ValueIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name(usize::MAX))
    }
}
