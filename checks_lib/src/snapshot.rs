//! Serialised platform state that backs the check collaborators

use crate::error::{AppError, Result};
use crate::health::sources::{
    lenient, ConfigReader, Indexer, IndexerRegistry, ModuleRegistry, OpcacheStatistics,
    OpcacheStatus, OpcacheStatusSource, ProductCatalog, SourceError,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(SnapshotFormat::Json),
            Some("yaml") | Some("yml") => Ok(SnapshotFormat::Yaml),
            other => Err(AppError::Snapshot(format!(
                "unsupported snapshot format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerState {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default = "default_indexer_status", deserialize_with = "indexer_status")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub scheduled: bool,
    #[serde(default, deserialize_with = "lenient::version")]
    pub changelog_version: i64,
    #[serde(default, deserialize_with = "lenient::version")]
    pub last_processed_version: i64,
}

fn default_indexer_status() -> String {
    "valid".to_string()
}

fn indexer_status<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    let status = lenient::text(deserializer)?;
    Ok(if status.is_empty() { default_indexer_status() } else { status })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpcacheSnapshot {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub available: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "statistics_object")]
    pub statistics: Option<OpcacheStatistics>,
}

/// Anything but an object (`false` from a disabled cache, say) means no statistics.
fn statistics_object<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<OpcacheStatistics>, D::Error> {
    match Value::deserialize(deserializer)? {
        object @ Value::Object(_) => Ok(serde_json::from_value(object).ok()),
        _ => Ok(None),
    }
}

/// Everything the checks read, captured from a running store.
///
/// `deployment` mirrors the deployment configuration tree and `store_config`
/// the scoped store configuration; both are addressed with `/`-separated
/// paths. A missing `product_count` means the catalogue could not be queried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSnapshot {
    #[serde(default)]
    pub deployment: Value,
    #[serde(default)]
    pub store_config: Value,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub indexers: BTreeMap<String, IndexerState>,
    #[serde(default, deserialize_with = "lenient::optional_counter")]
    pub product_count: Option<u64>,
    #[serde(default)]
    pub opcache: OpcacheSnapshot,
}

impl PlatformSnapshot {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SnapshotFormat::from_path(path)?;
        let contents = tokio::fs::read_to_string(path).await?;

        debug!("Loaded platform snapshot from {} ({} bytes)", path.display(), contents.len());
        Self::parse(&contents, format)
    }

    pub fn parse(contents: &str, format: SnapshotFormat) -> Result<Self> {
        let snapshot = match format {
            SnapshotFormat::Json => serde_json::from_str(contents)?,
            SnapshotFormat::Yaml => serde_yaml::from_str(contents)?,
        };
        Ok(snapshot)
    }

    pub fn deployment_config(self: &Arc<Self>) -> DeploymentConfig {
        DeploymentConfig(self.clone())
    }

    pub fn store_config(self: &Arc<Self>) -> StoreConfig {
        StoreConfig(self.clone())
    }
}

/// Resolves `a/b/c` through nested objects.
pub fn lookup_path<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(tree, |node, segment| node.as_object()?.get(segment))
}

pub struct DeploymentConfig(Arc<PlatformSnapshot>);

impl ConfigReader for DeploymentConfig {
    fn get(&self, path: &str) -> Option<Value> {
        lookup_path(&self.0.deployment, path).cloned()
    }
}

pub struct StoreConfig(Arc<PlatformSnapshot>);

impl ConfigReader for StoreConfig {
    fn get(&self, path: &str) -> Option<Value> {
        lookup_path(&self.0.store_config, path).cloned()
    }
}

impl IndexerRegistry for PlatformSnapshot {
    fn get(&self, id: &str) -> std::result::Result<Indexer, SourceError> {
        let state = self
            .indexers
            .get(id)
            .ok_or_else(|| SourceError::NotFound(format!("indexer '{}'", id)))?;

        Ok(Indexer {
            title: state.title.clone(),
            status: state.status.clone(),
            scheduled: state.scheduled,
            changelog_version: state.changelog_version,
            last_processed_version: state.last_processed_version,
        })
    }
}

impl ProductCatalog for PlatformSnapshot {
    fn product_count(&self) -> std::result::Result<u64, SourceError> {
        self.product_count
            .ok_or_else(|| SourceError::Unavailable("product count not captured".to_string()))
    }
}

impl ModuleRegistry for PlatformSnapshot {
    fn has(&self, module: &str) -> bool {
        self.modules.iter().any(|m| m == module)
    }
}

impl OpcacheStatusSource for PlatformSnapshot {
    fn status(&self) -> OpcacheStatus {
        if !self.opcache.available {
            return OpcacheStatus::Unavailable;
        }

        match (&self.opcache.statistics, self.opcache.enabled) {
            (Some(statistics), true) => OpcacheStatus::Enabled(statistics.clone()),
            _ => OpcacheStatus::Disabled,
        }
    }
}
