//! Product categories under `bss_categories`.

use std::sync::Arc;

use bss_catalog::{add_category, DEFAULT_CATEGORIES};

use crate::document::DocumentStore;
use crate::error::StoreResult;
use crate::keys;
use crate::seed::SeedSource;
use crate::storage::Storage;

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

pub struct CategoryStore {
    doc: DocumentStore<Vec<String>>,
}

impl CategoryStore {
    pub fn new(storage: Arc<dyn Storage>, seeds: Arc<dyn SeedSource>) -> Self {
        Self {
            doc: DocumentStore::new(storage, seeds, keys::CATEGORIES, None, default_categories),
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<String>> {
        self.doc.get().await
    }

    /// Add unless already present; returns whether it was added.
    pub async fn add(&self, name: &str) -> StoreResult<bool> {
        self.doc.update(|cats| Ok(add_category(cats, name))).await
    }

    pub async fn remove(&self, name: &str) -> StoreResult<bool> {
        self.doc
            .update(|cats| {
                let before = cats.len();
                cats.retain(|c| c != name);
                Ok(cats.len() != before)
            })
            .await
    }
}
