use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_core::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryItem {
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Availability of an equipment line against current stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    Available,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Not Available")]
    NotAvailable,
}

impl StockStatus {
    /// `None` stock means the item is not stocked at all.
    pub fn classify(stock: Option<u32>, need: u32) -> Self {
        match stock {
            None => StockStatus::NotAvailable,
            Some(s) if s >= need => StockStatus::Available,
            Some(_) => StockStatus::LowStock,
        }
    }
}

/// Stock list, stored as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<InventoryItem> {
        self.items
    }

    /// Stock on hand for an item name (exact, case-sensitive match).
    pub fn available_stock(&self, name: &str) -> Option<u32> {
        self.by_name(name).map(|i| i.stock)
    }

    pub fn status_for(&self, name: &str, need: u32) -> StockStatus {
        StockStatus::classify(self.available_stock(name), need)
    }

    /// Take `qty` units. Stock is untouched unless all of it is available.
    pub fn allocate(&mut self, name: &str, qty: u32) -> bool {
        match self.items.iter_mut().find(|i| i.name == name) {
            Some(item) if item.stock >= qty => {
                item.stock -= qty;
                true
            }
            _ => false,
        }
    }

    pub fn release(&mut self, name: &str, qty: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.name == name) {
            item.stock = item.stock.saturating_add(qty);
        }
    }

    /// Insert a new item or merge into the one with the same sku.
    pub fn upsert(&mut self, item: InventoryItem) -> DomainResult<()> {
        DomainError::require_text("sku", &item.sku)?;
        match self.items.iter_mut().find(|i| i.sku == item.sku) {
            Some(existing) => {
                if !item.name.is_empty() {
                    existing.name = item.name;
                }
                existing.stock = item.stock;
                existing.extra.extend(item.extra);
            }
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Shallow-merge a JSON patch into the item with `sku`. Returns whether
    /// an item was found.
    pub fn update(&mut self, sku: &str, patch: &Value) -> DomainResult<bool> {
        let Some(item) = self.items.iter_mut().find(|i| i.sku == sku) else {
            return Ok(false);
        };
        let Value::Object(changes) = patch else {
            return Err(DomainError::validation("inventory patch must be an object"));
        };
        let mut shape = serde_json::to_value(&*item)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        if let Value::Object(map) = &mut shape {
            for (k, v) in changes {
                map.insert(k.clone(), v.clone());
            }
            map.insert("sku".to_string(), Value::from(sku));
        }
        *item = serde_json::from_value(shape).map_err(|e| DomainError::validation(e.to_string()))?;
        Ok(true)
    }

    pub fn remove(&mut self, sku: &str) -> Option<InventoryItem> {
        let idx = self.items.iter().position(|i| i.sku == sku)?;
        Some(self.items.remove(idx))
    }

    fn by_name(&self, name: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.name == name)
    }
}
