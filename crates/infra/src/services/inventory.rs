//! Stock levels under the `inventory` key.

use std::sync::Arc;

use serde_json::Value;

use bss_inventory::{Inventory, InventoryItem, StockStatus};

use crate::document::DocumentStore;
use crate::error::StoreResult;
use crate::keys::{self, seeds};
use crate::seed::SeedSource;
use crate::storage::Storage;

pub struct InventoryStore {
    doc: DocumentStore<Inventory>,
}

impl InventoryStore {
    pub fn new(storage: Arc<dyn Storage>, seeds: Arc<dyn SeedSource>) -> Self {
        Self {
            doc: DocumentStore::new(storage, seeds, keys::INVENTORY, Some(seeds::INVENTORY), Inventory::default),
        }
    }

    pub async fn snapshot(&self) -> StoreResult<Inventory> {
        self.doc.get().await
    }

    pub async fn items(&self) -> StoreResult<Vec<InventoryItem>> {
        self.doc.read(|inv| inv.items().to_vec()).await
    }

    pub async fn available_stock(&self, name: &str) -> StoreResult<Option<u32>> {
        self.doc.read(|inv| inv.available_stock(name)).await
    }

    pub async fn status_for(&self, name: &str, need: u32) -> StoreResult<StockStatus> {
        self.doc.read(|inv| inv.status_for(name, need)).await
    }

    /// Take `qty` units of `name`; `false` (and no change) when short.
    pub async fn allocate(&self, name: &str, qty: u32) -> StoreResult<bool> {
        let taken = self.doc.update(|inv| Ok(inv.allocate(name, qty))).await?;
        if taken {
            tracing::info!(item = name, qty, "stock allocated");
        } else {
            tracing::warn!(item = name, qty, "insufficient stock");
        }
        Ok(taken)
    }

    pub async fn release(&self, name: &str, qty: u32) -> StoreResult<()> {
        self.doc.update(|inv| {
            inv.release(name, qty);
            Ok(())
        })
        .await
    }

    pub async fn upsert(&self, item: InventoryItem) -> StoreResult<()> {
        self.doc.update(|inv| Ok(inv.upsert(item)?)).await
    }

    pub async fn update(&self, sku: &str, patch: Value) -> StoreResult<bool> {
        self.doc.update(|inv| Ok(inv.update(sku, &patch)?)).await
    }

    pub async fn remove(&self, sku: &str) -> StoreResult<Option<InventoryItem>> {
        self.doc.update(|inv| Ok(inv.remove(sku))).await
    }
}
