//! Read-only reference fixtures, loaded once per catalog.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use bss_catalog::{resource_by_id, status_by_code, CustomerDetails, DeviceTemplate, DeviceTemplates, DolphinPages, OrderStatus, Resource};
use bss_provisioning::WizardData;

use crate::document::DocumentStore;
use crate::error::StoreResult;
use crate::keys::{self, seeds};
use crate::seed::SeedSource;
use crate::storage::Storage;

/// Device templates, statuses, resources, page content, customer details and
/// the wizard template.
///
/// A missing or malformed fixture is logged and treated as empty.
pub struct FixtureCatalog {
    seeds: Arc<dyn SeedSource>,
    device_templates: OnceCell<Arc<DeviceTemplates>>,
    statuses: OnceCell<Arc<Vec<OrderStatus>>>,
    resources: OnceCell<Arc<Vec<Resource>>>,
    dolphin_pages: OnceCell<Arc<DolphinPages>>,
    wizard_template: OnceCell<Arc<WizardData>>,
    customer_details: DocumentStore<CustomerDetails>,
}

impl FixtureCatalog {
    pub fn new(storage: Arc<dyn Storage>, seeds: Arc<dyn SeedSource>) -> Self {
        Self {
            customer_details: DocumentStore::new(
                storage,
                seeds.clone(),
                keys::CUSTOMER_DETAILS_CACHE,
                Some(seeds::CUSTOMER_DETAILS),
                CustomerDetails::new,
            ),
            seeds,
            device_templates: OnceCell::new(),
            statuses: OnceCell::new(),
            resources: OnceCell::new(),
            dolphin_pages: OnceCell::new(),
            wizard_template: OnceCell::new(),
        }
    }

    pub async fn device_templates(&self) -> Arc<DeviceTemplates> {
        self.device_templates
            .get_or_init(|| fixture(self.seeds.as_ref(), seeds::DEVICE_TEMPLATES))
            .await
            .clone()
    }

    pub async fn template_for(&self, resource_id: &str) -> Option<DeviceTemplate> {
        self.device_templates().await.get(resource_id).cloned()
    }

    pub async fn statuses(&self) -> Arc<Vec<OrderStatus>> {
        self.statuses
            .get_or_init(|| fixture(self.seeds.as_ref(), seeds::STATUSES))
            .await
            .clone()
    }

    pub async fn status_by_code(&self, code: &str) -> Option<OrderStatus> {
        status_by_code(&self.statuses().await, code).cloned()
    }

    pub async fn resources(&self) -> Arc<Vec<Resource>> {
        self.resources
            .get_or_init(|| fixture(self.seeds.as_ref(), seeds::RESOURCES))
            .await
            .clone()
    }

    pub async fn resource_by_id(&self, id: &Value) -> Option<Resource> {
        resource_by_id(&self.resources().await, id).cloned()
    }

    /// Rows of one content section; unknown sections are empty.
    pub async fn dolphin_section(&self, section: &str) -> Vec<Value> {
        self.dolphin_pages
            .get_or_init(|| fixture(self.seeds.as_ref(), seeds::DOLPHIN_PAGES))
            .await
            .get(section)
            .cloned()
            .unwrap_or_default()
    }

    /// Base document every order's wizard starts from.
    pub async fn wizard_template(&self) -> WizardData {
        self.wizard_template
            .get_or_init(|| fixture(self.seeds.as_ref(), seeds::ORDER_WIZARD_DATA))
            .await
            .as_ref()
            .clone()
    }

    /// Detail sheet of one customer, cached in storage after the first read.
    pub async fn customer_details(&self, id: &str) -> StoreResult<Option<Value>> {
        self.customer_details.read(|all| all.get(id).cloned()).await
    }
}

async fn fixture<T: DeserializeOwned + Default>(seeds: &dyn SeedSource, name: &str) -> Arc<T> {
    let parsed = match seeds.load(name).await {
        Ok(Some(value)) => serde_json::from_value(value).map_err(|e| e.to_string()),
        Ok(None) => Err("missing".to_string()),
        Err(err) => Err(err.to_string()),
    };
    match parsed {
        Ok(value) => Arc::new(value),
        Err(error) => {
            tracing::warn!(seed = name, %error, "fixture unavailable; using empty");
            Arc::new(T::default())
        }
    }
}
