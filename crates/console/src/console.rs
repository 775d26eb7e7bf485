//! Composition root.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use bss_auth::{authorize, AuthzError, Role, Session};
use bss_billing::{billing_preview, dashboard, order_financials, BillingInputs, BillingMonth, BillingPreview, Dashboard, OrderFinancials};
use bss_catalog::{Cfs, Offering, Price, Product, Rfs};
use bss_core::RecordId;
use bss_crm::{Customer, Ticket};
use bss_infra::{
    CategoryStore, FixtureCatalog, FixtureDir, FulfillmentService, InMemoryStorage, InventoryStore, OfferingService,
    OrderService, Repository, SeedSource, SessionStore, SqliteStorage, Storage, StoreError, StoreResult, TicketService,
    WizardStore,
};
use bss_orders::{NewOrder, Order};

use crate::config::{ConsoleConfig, StoreConfig};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Unauthorized(#[from] AuthzError),
}

/// Customer page: the customer, their tickets and orders, and the detail sheet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOverview {
    pub customer: Customer,
    pub tickets: Vec<Ticket>,
    pub orders: Vec<Order>,
    pub details: Option<Value>,
}

/// Every repository and service of the console over one storage backend.
pub struct Console {
    pub storage: Arc<dyn Storage>,
    pub customers: Arc<Repository<Customer>>,
    pub products: Arc<Repository<Product>>,
    pub prices: Arc<Repository<Price>>,
    pub cfs: Arc<Repository<Cfs>>,
    pub rfs: Arc<Repository<Rfs>>,
    pub tickets: TicketService,
    pub offerings: OfferingService,
    pub orders: OrderService,
    pub categories: CategoryStore,
    pub inventory: Arc<InventoryStore>,
    pub fixtures: Arc<FixtureCatalog>,
    pub wizard: Arc<WizardStore>,
    pub fulfillment: FulfillmentService,
    pub sessions: SessionStore,
}

impl Console {
    pub fn new(storage: Arc<dyn Storage>, seeds: Arc<dyn SeedSource>) -> Self {
        let customers = Arc::new(Repository::<Customer>::new(storage.clone(), seeds.clone()));
        let tickets = Arc::new(Repository::<Ticket>::new(storage.clone(), seeds.clone()));
        let products = Arc::new(Repository::<Product>::new(storage.clone(), seeds.clone()));
        let offerings = Arc::new(Repository::<Offering>::new(storage.clone(), seeds.clone()));
        let prices = Arc::new(Repository::<Price>::new(storage.clone(), seeds.clone()));
        let cfs = Arc::new(Repository::<Cfs>::new(storage.clone(), seeds.clone()));
        let rfs = Arc::new(Repository::<Rfs>::new(storage.clone(), seeds.clone()));
        let orders = Arc::new(Repository::<Order>::new(storage.clone(), seeds.clone()));

        let fixtures = Arc::new(FixtureCatalog::new(storage.clone(), seeds.clone()));
        let inventory = Arc::new(InventoryStore::new(storage.clone(), seeds.clone()));
        let wizard = Arc::new(WizardStore::new(storage.clone(), fixtures.clone(), inventory.clone()));
        let fulfillment = FulfillmentService::new(
            offerings.clone(),
            products.clone(),
            prices.clone(),
            inventory.clone(),
            fixtures.clone(),
            wizard.clone(),
        );

        Self {
            categories: CategoryStore::new(storage.clone(), seeds),
            sessions: SessionStore::new(storage.clone()),
            tickets: TicketService::new(tickets),
            offerings: OfferingService::new(offerings.clone()),
            orders: OrderService::new(orders, offerings, products.clone(), customers.clone()),
            storage,
            customers,
            products,
            prices,
            cfs,
            rfs,
            inventory,
            fixtures,
            wizard,
            fulfillment,
        }
    }

    /// Open the configured storage backend with fixtures from `data_dir`.
    pub async fn open(config: &ConsoleConfig) -> StoreResult<Self> {
        let storage: Arc<dyn Storage> = match &config.store {
            StoreConfig::Memory => Arc::new(InMemoryStorage::new()),
            StoreConfig::Sqlite(url) if url.starts_with("sqlite:") => Arc::new(SqliteStorage::connect(url).await?),
            StoreConfig::Sqlite(path) => Arc::new(SqliteStorage::open_file(Path::new(path)).await?),
        };
        let seeds: Arc<dyn SeedSource> = Arc::new(FixtureDir::new(config.data_dir.clone()));
        tracing::info!(data_dir = %config.data_dir.display(), store = ?config.store, "console opened");
        Ok(Self::new(storage, seeds))
    }

    /// Load (and seed where needed) every collection.
    pub async fn warm(&self) -> StoreResult<()> {
        let customers = self.customers.count().await?;
        let tickets = self.tickets.repository().count().await?;
        let products = self.products.count().await?;
        let offerings = self.offerings.repository().count().await?;
        let prices = self.prices.count().await?;
        let cfs = self.cfs.count().await?;
        let rfs = self.rfs.count().await?;
        let orders = self.orders.repository().count().await?;
        let inventory = self.inventory.items().await?.len();
        let categories = self.categories.list().await?.len();
        tracing::info!(customers, tickets, products, offerings, prices, cfs, rfs, orders, inventory, categories, "collections loaded");
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> StoreResult<Option<Session>> {
        self.sessions.login(username, password).await
    }

    /// Current session, when it carries one of `allowed` (any role when empty).
    pub async fn require_role(&self, allowed: &[Role]) -> Result<Session, ConsoleError> {
        let session = self.sessions.current().await?;
        authorize(session.as_ref(), allowed)?;
        session.ok_or(ConsoleError::Unauthorized(AuthzError::Unauthenticated))
    }

    /// Place an order and generate its fulfillment wizard.
    pub async fn place_order(&self, form: NewOrder) -> StoreResult<Order> {
        let order = self.orders.place(form).await?;
        self.fulfillment.provision_order(&order).await?;
        Ok(order)
    }

    pub async fn customer_overview(&self, id: RecordId) -> StoreResult<Option<CustomerOverview>> {
        let Some(customer) = self.customers.get(id).await? else {
            return Ok(None);
        };
        let tickets = self.tickets.for_customer(id).await?;
        let orders = self
            .orders
            .repository()
            .list()
            .await?
            .into_iter()
            .filter(|o| o.customer_id == Some(id))
            .collect();
        let details = self.fixtures.customer_details(&id.to_string()).await?;
        Ok(Some(CustomerOverview {
            customer,
            tickets,
            orders,
            details,
        }))
    }

    pub async fn dashboard(&self) -> StoreResult<Dashboard> {
        let customers = self.customers.list().await?;
        let orders = self.orders.repository().list().await?;
        let offerings = self.offerings.repository().list().await?;
        let tickets = self.tickets.repository().count().await?;
        let products = self.products.count().await?;
        Ok(dashboard(&customers, &orders, &offerings, tickets, products))
    }

    pub async fn billing_preview(&self, month: BillingMonth) -> StoreResult<BillingPreview> {
        let orders = self.orders.repository().list().await?;
        let customers = self.customers.list().await?;
        let offerings = self.offerings.repository().list().await?;
        let products = self.products.list().await?;
        let prices = self.prices.list().await?;
        let inputs = BillingInputs {
            customers: &customers,
            offerings: &offerings,
            products: &products,
            prices: &prices,
        };
        Ok(billing_preview(month, &orders, inputs))
    }

    /// Billing preview for the current month.
    pub async fn current_billing_preview(&self) -> StoreResult<BillingPreview> {
        self.billing_preview(BillingMonth::of(Utc::now().date_naive())).await
    }

    /// Value of an order's offering; `None` for orders without a known offering.
    pub async fn order_financials(&self, order_id: RecordId) -> StoreResult<Option<OrderFinancials>> {
        let order = self.orders.repository().require(order_id).await?;
        let Some(offering) = order.offering_id else {
            return Ok(None);
        };
        let Some(offering) = self.offerings.repository().get(offering).await? else {
            return Ok(None);
        };
        let products = self.products.list().await?;
        let prices = self.prices.list().await?;
        Ok(Some(order_financials(&offering, &products, &prices)))
    }
}
