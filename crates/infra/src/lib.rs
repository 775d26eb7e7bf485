//! Infrastructure layer: key/value storage, fixture seeds, repositories and
//! the storage-backed services the console is built from.
//!
//! Every collection is a JSON document held under a fixed storage key. On
//! first access a collection is loaded from storage, or seeded from its
//! fixture when nothing is stored yet, and then cached in the owning store
//! object. Writes go through to storage before the cache is updated.

pub mod document;
pub mod error;
pub mod keys;
pub mod records;
pub mod repository;
pub mod seed;
pub mod services;
pub mod storage;

pub use document::DocumentStore;
pub use error::{StoreError, StoreResult};
pub use records::Record;
pub use repository::Repository;
pub use seed::{FixtureDir, SeedSource, StaticSeeds};
pub use services::{
    CategoryStore, FixtureCatalog, FulfillmentService, InventoryStore, OfferingService, OrderService,
    SessionStore, TicketService, WizardStore,
};
pub use storage::{InMemoryStorage, SqliteStorage, Storage};
