//! Collaborator interfaces the checks read from

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Path-addressed configuration, e.g. `sentry/dsn`.
pub trait ConfigReader: Send + Sync {
    fn get(&self, path: &str) -> Option<Value>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indexer {
    pub title: String,
    pub status: String,
    pub scheduled: bool,
    pub changelog_version: i64,
    pub last_processed_version: i64,
}

impl Indexer {
    /// Pending changelog entries; never negative.
    pub fn backlog(&self) -> u64 {
        self.changelog_version
            .saturating_sub(self.last_processed_version)
            .max(0) as u64
    }
}

pub trait IndexerRegistry: Send + Sync {
    fn get(&self, id: &str) -> Result<Indexer, SourceError>;
}

pub trait ProductCatalog: Send + Sync {
    fn product_count(&self) -> Result<u64, SourceError>;
}

pub trait ModuleRegistry: Send + Sync {
    fn has(&self, module: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpcacheStatistics {
    #[serde(default, deserialize_with = "lenient::counter")]
    pub hits: u64,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub misses: u64,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub blacklist_misses: u64,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub num_cached_scripts: u64,
    #[serde(default, alias = "opcache_hit_rate", deserialize_with = "lenient::rate")]
    pub hit_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpcacheStatus {
    Unavailable,
    Disabled,
    Enabled(OpcacheStatistics),
}

pub trait OpcacheStatusSource: Send + Sync {
    fn status(&self) -> OpcacheStatus;
}

/// Loose emptiness used for configuration values: null, false, zero,
/// `""`, `"0"` and empty collections all count as not set.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
    }
}

/// Configuration flags count as on only for `"1"`, `1` or `true`.
pub fn is_enabled_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1) || n.as_u64() == Some(1),
        Some(Value::String(s)) => s == "1",
        _ => false,
    }
}

/// Field readers for captured platform state. A malformed value falls back
/// to the field default instead of rejecting the whole document.
pub mod lenient {
    use super::is_enabled_flag;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn finite(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|f| f.is_finite())
    }

    fn unsigned(value: &Value) -> Option<u64> {
        value
            .as_u64()
            .or_else(|| finite(value).filter(|f| *f >= 0.0).map(|f| f as u64))
    }

    fn signed(value: &Value) -> Option<i64> {
        value.as_i64().or_else(|| finite(value).map(|f| f as i64))
    }

    /// Non-negative counter; `null`, negatives and text become 0, floats truncate.
    pub fn counter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        Ok(unsigned(&Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn optional_counter<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        Ok(unsigned(&Value::deserialize(deserializer)?))
    }

    pub fn version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(signed(&Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn rate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(finite(&Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(is_enabled_flag(Some(&Value::deserialize(deserializer)?)))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}
