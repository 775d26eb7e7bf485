//! A single JSON document under one storage key (inventory, categories,
//! fixture caches).

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::seed::SeedSource;
use crate::storage::{load_json, save_json, Storage};

/// Lazily loaded, write-through document.
///
/// First access reads `key` from storage. When nothing is stored the
/// document comes from the `seed` fixture, or from `fallback` when there is
/// no fixture or it cannot be used, and is written back.
pub struct DocumentStore<T> {
    storage: Arc<dyn Storage>,
    seeds: Arc<dyn SeedSource>,
    key: String,
    seed: Option<&'static str>,
    fallback: fn() -> T,
    cache: RwLock<Option<T>>,
}

impl<T> DocumentStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(
        storage: Arc<dyn Storage>,
        seeds: Arc<dyn SeedSource>,
        key: impl Into<String>,
        seed: Option<&'static str>,
        fallback: fn() -> T,
    ) -> Self {
        Self {
            storage,
            seeds,
            key: key.into(),
            seed,
            fallback,
            cache: RwLock::new(None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn get(&self) -> StoreResult<T> {
        self.read(T::clone).await
    }

    pub async fn read<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&T) -> R + Send,
    {
        {
            let guard = self.cache.read().await;
            if let Some(doc) = guard.as_ref() {
                return Ok(f(doc));
            }
        }
        let mut guard = self.cache.write().await;
        let doc = self.loaded(&mut guard).await?;
        Ok(f(doc))
    }

    /// Edit a copy, persist it, then publish it. A failing edit changes nothing.
    pub async fn update<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut T) -> StoreResult<R> + Send,
    {
        let mut guard = self.cache.write().await;
        let doc = self.loaded(&mut guard).await?;
        let mut next = doc.clone();
        let out = f(&mut next)?;
        save_json(self.storage.as_ref(), &self.key, &next).await?;
        *doc = next;
        Ok(out)
    }

    pub async fn set(&self, value: T) -> StoreResult<()> {
        self.update(move |doc| {
            *doc = value;
            Ok(())
        })
        .await
    }

    async fn loaded<'g>(&self, slot: &'g mut Option<T>) -> StoreResult<&'g mut T> {
        if slot.is_none() {
            *slot = Some(self.load().await?);
        }
        Ok(slot.get_or_insert_with(self.fallback))
    }

    async fn load(&self) -> StoreResult<T> {
        if let Some(doc) = load_json(self.storage.as_ref(), &self.key).await? {
            return Ok(doc);
        }
        let doc = match self.seed {
            Some(name) => self.seeded(name).await,
            None => None,
        }
        .unwrap_or_else(self.fallback);
        save_json(self.storage.as_ref(), &self.key, &doc).await?;
        Ok(doc)
    }

    async fn seeded(&self, name: &str) -> Option<T> {
        match self.seeds.load(name).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(doc) => Some(doc),
                Err(err) => {
                    tracing::warn!(key = %self.key, seed = name, error = %err, "seed fixture malformed");
                    None
                }
            },
            Ok(None) => {
                tracing::warn!(key = %self.key, seed = name, "seed fixture missing");
                None
            }
            Err(err) => {
                tracing::warn!(key = %self.key, seed = name, error = %err, "seed fixture unreadable");
                None
            }
        }
    }
}
