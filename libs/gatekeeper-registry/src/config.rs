//! Per-provider configuration sections.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration for provider '{name}': {source}")]
    InvalidSection {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("provider configuration must be a mapping of provider name to section")]
    NotAMapping,
}

/// Configuration of the running system as seen by provider factories.
///
/// Holds one section per provider name (`providers.<name>` in the server
/// config file). A missing section deserializes from an empty mapping, so
/// `#[serde(default)]` configs fall back to their defaults while configs with
/// required fields fail at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemConfig {
    providers: Map<String, Value>,
}

impl SystemConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object of `name -> section`. `null` yields an empty config.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotAMapping`] for any other non-object value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(providers) => Ok(Self { providers }),
            Value::Null => Ok(Self::default()),
            _ => Err(ConfigError::NotAMapping),
        }
    }

    /// Add or replace the section of one provider.
    #[must_use]
    pub fn with_provider(mut self, name: impl Into<String>, section: Value) -> Self {
        self.providers.insert(name.into(), section);
        self
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.providers.get(name)
    }

    /// Deserialize the section of provider `name` into `T`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidSection`] if the section does not match `T`.
    pub fn provider_config<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let section = match self.providers.get(name) {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(v) => v.clone(),
        };
        serde_json::from_value(section).map_err(|source| ConfigError::InvalidSection {
            name: name.to_owned(),
            source,
        })
    }
}
