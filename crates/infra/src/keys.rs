//! Storage keys of every persisted document.

pub const CUSTOMERS: &str = "bss_customers";
pub const TICKETS: &str = "bss_tickets";
pub const PRODUCTS: &str = "bss_products";
pub const OFFERINGS: &str = "bss_offerings";
pub const PRICES: &str = "bss_prices";
pub const RFS: &str = "bss_rfs";
pub const CFS: &str = "bss_cfs";
pub const CATEGORIES: &str = "bss_categories";
pub const ORDERS: &str = "bss_orders";
pub const INVENTORY: &str = "inventory";
pub const USER: &str = "bss_user";
pub const CUSTOMER_DETAILS_CACHE: &str = "bss_customer_details_cache";

const WIZARD_PREFIX: &str = "orderWizardData_";

/// Per-order wizard document key, e.g. `orderWizardData_12`.
pub fn wizard(order_id: impl core::fmt::Display) -> String {
    format!("{WIZARD_PREFIX}{order_id}")
}

/// Seed fixture names (`<name>.json` in a fixture directory).
pub mod seeds {
    pub const CUSTOMERS: &str = "customers";
    pub const TICKETS: &str = "tickets";
    pub const PRODUCTS: &str = "products";
    pub const OFFERINGS: &str = "offerings";
    pub const PRICES: &str = "prices";
    pub const RFS: &str = "rfs";
    pub const CFS: &str = "cfs";
    pub const ORDERS: &str = "orders";
    pub const INVENTORY: &str = "inventory";
    pub const DEVICE_TEMPLATES: &str = "device_templates";
    pub const ORDER_WIZARD_DATA: &str = "order_wizard_data";
    pub const STATUSES: &str = "statuses";
    pub const RESOURCES: &str = "resources";
    pub const DOLPHIN_PAGES: &str = "dolphin_pages";
    pub const CUSTOMER_DETAILS: &str = "customer_details";
}
