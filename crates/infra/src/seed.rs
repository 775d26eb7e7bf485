//! Static seed fixtures for first-load collections.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Source of named JSON fixtures.
///
/// `Ok(None)` means the fixture does not exist; errors mean it exists but
/// could not be read or parsed.
#[async_trait::async_trait]
pub trait SeedSource: Send + Sync {
    async fn load(&self, name: &str) -> StoreResult<Option<Value>>;
}

#[async_trait::async_trait]
impl<S> SeedSource for Arc<S>
where
    S: SeedSource + ?Sized,
{
    async fn load(&self, name: &str) -> StoreResult<Option<Value>> {
        (**self).load(name).await
    }
}

/// Fixtures read from `<root>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FixtureDir {
    root: PathBuf,
}

impl FixtureDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

#[async_trait::async_trait]
impl SeedSource for FixtureDir {
    async fn load(&self, name: &str) -> StoreResult<Option<Value>> {
        let path = self.path_of(name);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Seed(format!("read {}: {e}", path.display()))),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Seed(format!("parse {}: {e}", path.display())))
    }
}

/// In-memory fixtures for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSeeds {
    seeds: HashMap<String, Value>,
}

impl StaticSeeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.seeds.insert(name.into(), value);
        self
    }
}

#[async_trait::async_trait]
impl SeedSource for StaticSeeds {
    async fn load(&self, name: &str) -> StoreResult<Option<Value>> {
        Ok(self.seeds.get(name).cloned())
    }
}
