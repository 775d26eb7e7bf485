//! Catalog domain module.
//!
//! Product, service (CFS/RFS) and offering specifications plus the price
//! records and device templates they reference. Pure domain logic: lookups
//! take the collections as slices and never touch storage.

pub mod activation;
pub mod category;
pub mod device_template;
pub mod fixtures;
pub mod offering;
pub mod price;
pub mod product;
pub mod service;

pub use activation::{move_step, remove_step, toggle_step, ACTIVATION_STEPS};
pub use category::{add_category, DEFAULT_CATEGORIES};
pub use device_template::{ConfigField, ConfigSection, DeviceTemplate, DeviceTemplates};
pub use fixtures::{resource_by_id, status_by_code, CustomerDetails, DolphinPages, OrderStatus, Resource};
pub use offering::{BillingMode, Component, Offering, PricePlan};
pub use price::{find_price, Price};
pub use product::{find_product, Product};
pub use service::{all_rfs_ids, Cfs, Rfs};
