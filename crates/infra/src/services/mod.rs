//! Storage-backed services composed from repositories and documents.

mod categories;
mod fixtures;
mod fulfillment;
mod inventory;
mod offerings;
mod orders;
mod session;
mod tickets;
mod wizard;

pub use categories::CategoryStore;
pub use fixtures::FixtureCatalog;
pub use fulfillment::FulfillmentService;
pub use inventory::InventoryStore;
pub use offerings::OfferingService;
pub use orders::OrderService;
pub use session::SessionStore;
pub use tickets::TicketService;
pub use wizard::WizardStore;
