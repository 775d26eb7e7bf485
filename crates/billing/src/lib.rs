//! Billing and KPI read models.
//!
//! Everything here is computed on the fly from orders, offerings and prices;
//! nothing is stored.

pub mod dashboard;
pub mod financials;
pub mod preview;

pub use dashboard::{dashboard, Dashboard, TopCustomer};
pub use financials::{order_financials, OrderFinancials};
pub use preview::{billing_preview, BillingInputs, BillingLine, BillingMonth, BillingPreview};
