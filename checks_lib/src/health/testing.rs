//! In-memory collaborators for check tests

use super::sources::{
    ConfigReader, Indexer, IndexerRegistry, ModuleRegistry, OpcacheStatus, OpcacheStatusSource,
    ProductCatalog, SourceError,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct MapConfig(HashMap<String, Value>);

impl MapConfig {
    pub fn with(mut self, path: &str, value: Value) -> Self {
        self.0.insert(path.to_string(), value);
        self
    }
}

impl ConfigReader for MapConfig {
    fn get(&self, path: &str) -> Option<Value> {
        self.0.get(path).cloned()
    }
}

#[derive(Default)]
pub struct FakeIndexers {
    indexers: HashMap<String, Indexer>,
    failing: HashSet<String>,
}

impl FakeIndexers {
    fn insert(
        mut self,
        id: &str,
        scheduled: bool,
        changelog_version: i64,
        last_processed_version: i64,
    ) -> Self {
        self.indexers.insert(
            id.to_string(),
            Indexer {
                title: format!("{} indexer", id),
                status: "valid".to_string(),
                scheduled,
                changelog_version,
                last_processed_version,
            },
        );
        self
    }

    pub fn scheduled(self, id: &str, changelog_version: i64, last_processed_version: i64) -> Self {
        self.insert(id, true, changelog_version, last_processed_version)
    }

    pub fn realtime(self, id: &str, changelog_version: i64, last_processed_version: i64) -> Self {
        self.insert(id, false, changelog_version, last_processed_version)
    }

    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }
}

impl IndexerRegistry for FakeIndexers {
    fn get(&self, id: &str) -> Result<Indexer, SourceError> {
        if self.failing.contains(id) {
            return Err(SourceError::Unavailable(format!("changelog table for {} is missing", id)));
        }
        self.indexers
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("indexer '{}'", id)))
    }
}

pub struct FakeCatalog(Option<u64>);

impl FakeCatalog {
    pub fn count(count: u64) -> Self {
        Self(Some(count))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

impl ProductCatalog for FakeCatalog {
    fn product_count(&self) -> Result<u64, SourceError> {
        self.0
            .ok_or_else(|| SourceError::Unavailable("product collection query failed".to_string()))
    }
}

#[derive(Default)]
pub struct FakeModules(HashSet<String>);

impl FakeModules {
    pub fn with(modules: &[&str]) -> Self {
        Self(modules.iter().map(|m| m.to_string()).collect())
    }
}

impl ModuleRegistry for FakeModules {
    fn has(&self, module: &str) -> bool {
        self.0.contains(module)
    }
}

pub struct FakeOpcache(pub OpcacheStatus);

impl OpcacheStatusSource for FakeOpcache {
    fn status(&self) -> OpcacheStatus {
        self.0.clone()
    }
}
