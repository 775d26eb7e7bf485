//! Inventory domain module.
//!
//! Stock is tracked per item name (the same name an equipment line carries);
//! this crate holds the rules only, persistence lives in `bss-infra`.

pub mod stock;

pub use stock::{Inventory, InventoryItem, StockStatus};
