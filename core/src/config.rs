//! Client configuration: layered defaults and per-attempt overrides.
//!
//! # Design
//! `ClientConfig` is a named property bag. A key is looked up under the
//! client's own namespace (`"{name}.ConnectTimeout"`) before falling back to
//! the global entry (`"ConnectTimeout"`), so one source can hold settings for
//! several clients. Values stay as strings until `timeouts()` validates them;
//! that call is the single point where configuration becomes typed, and the
//! adapter refuses to exist if it fails.
//!
//! `RequestConfig` carries overrides for a single attempt. Each timeout kind
//! is resolved on its own: an override replaces the default for that kind and
//! leaves the other kind alone.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings understood by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    ConnectTimeout,
    ReadTimeout,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::ConnectTimeout, ConfigKey::ReadTimeout];

    /// Property name used in configuration sources.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::ConnectTimeout => "ConnectTimeout",
            ConfigKey::ReadTimeout => "ReadTimeout",
        }
    }

    /// Suffix used for environment variables, e.g. `GITHUB_CONNECT_TIMEOUT`.
    fn env_suffix(self) -> &'static str {
        match self {
            ConfigKey::ConnectTimeout => "CONNECT_TIMEOUT",
            ConfigKey::ReadTimeout => "READ_TIMEOUT",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated default timeouts, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect_ms: u32,
    pub read_ms: u32,
}

impl Timeouts {
    pub fn get(&self, key: ConfigKey) -> u32 {
        match key {
            ConfigKey::ConnectTimeout => self.connect_ms,
            ConfigKey::ReadTimeout => self.read_ms,
        }
    }
}

/// Named, layered configuration for one load-balanced client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    name: String,
    properties: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set `key` for this client only.
    pub fn set(mut self, key: ConfigKey, value: impl ToString) -> Self {
        self.properties
            .insert(format!("{}.{}", self.name, key.as_str()), value.to_string());
        self
    }

    /// Set `key` for every client reading this source.
    pub fn set_global(mut self, key: ConfigKey, value: impl ToString) -> Self {
        self.properties.insert(key.as_str().to_string(), value.to_string());
        self
    }

    /// Build from a flat JSON object such as
    /// `{"github.ConnectTimeout": 500, "ReadTimeout": "2000"}`.
    ///
    /// Values may be strings or numbers. Unrelated keys are kept but ignored.
    pub fn from_json(name: &str, raw: &str) -> Result<Self, ConfigError> {
        let map: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(raw).map_err(|e| ConfigError::Json(e.to_string()))?;

        let mut config = Self::new(name);
        for (key, value) in map {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    return Err(ConfigError::Json(format!(
                        "value for {key} must be a string or number, got {other}"
                    )))
                }
            };
            config.properties.insert(key, value);
        }
        Ok(config)
    }

    /// Build from `{NAME}_CONNECT_TIMEOUT` / `{NAME}_READ_TIMEOUT`, falling
    /// back to `CONNECT_TIMEOUT` / `READ_TIMEOUT`, resolved through `lookup`.
    pub fn from_lookup<F>(name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = name.to_ascii_uppercase().replace(['-', '.'], "_");
        let mut config = Self::new(name);
        for key in ConfigKey::ALL {
            if let Some(value) = lookup(&format!("{prefix}_{}", key.env_suffix())) {
                config = config.set(key, value);
            }
            if let Some(value) = lookup(key.env_suffix()) {
                config = config.set_global(key, value);
            }
        }
        config
    }

    pub fn from_env(name: &str) -> Self {
        Self::from_lookup(name, |var| std::env::var(var).ok())
    }

    /// Raw value for `key`, client namespace first.
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.properties
            .get(&format!("{}.{}", self.name, key.as_str()))
            .or_else(|| self.properties.get(key.as_str()))
            .map(String::as_str)
    }

    /// Validate and return the default timeouts.
    pub fn timeouts(&self) -> Result<Timeouts, ConfigError> {
        let timeouts = Timeouts {
            connect_ms: self.millis(ConfigKey::ConnectTimeout)?,
            read_ms: self.millis(ConfigKey::ReadTimeout)?,
        };
        log::debug!(
            "client {}: connect timeout {}ms, read timeout {}ms",
            self.name,
            timeouts.connect_ms,
            timeouts.read_ms
        );
        Ok(timeouts)
    }

    fn millis(&self, key: ConfigKey) -> Result<u32, ConfigError> {
        let raw = self.get(key).ok_or(ConfigError::Missing { key })?;
        parse_millis(key, raw)
    }
}

fn parse_millis(key: ConfigKey, raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

/// Overrides attached to a single request attempt. Absent fields fall back to
/// the client defaults, and so does a zero, which the client defaults reject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestConfig {
    pub connect_timeout: Option<u32>,
    pub read_timeout: Option<u32>,
}

impl RequestConfig {
    pub fn with_connect_timeout(mut self, ms: u32) -> Self {
        self.connect_timeout = Some(ms);
        self
    }

    pub fn with_read_timeout(mut self, ms: u32) -> Self {
        self.read_timeout = Some(ms);
        self
    }

    pub fn get(&self, key: ConfigKey) -> Option<u32> {
        let ms = match key {
            ConfigKey::ConnectTimeout => self.connect_timeout,
            ConfigKey::ReadTimeout => self.read_timeout,
        };
        ms.filter(|&ms| ms > 0)
    }
}

/// Resolve one timeout kind: the override when present, otherwise the default.
pub fn effective_timeout(
    overrides: Option<&RequestConfig>,
    defaults: &Timeouts,
    key: ConfigKey,
) -> Duration {
    let ms = overrides
        .and_then(|o| o.get(key))
        .unwrap_or_else(|| defaults.get(key));
    Duration::from_millis(u64::from(ms))
}
