//! Wizard generation from the stored catalog.

use std::sync::Arc;

use bss_catalog::{Offering, Price, Product};
use bss_core::RecordId;
use bss_orders::Order;
use bss_provisioning::{generate, FulfillmentInputs, WizardData};

use crate::error::StoreResult;
use crate::repository::Repository;
use crate::services::{FixtureCatalog, InventoryStore, WizardStore};

pub struct FulfillmentService {
    offerings: Arc<Repository<Offering>>,
    products: Arc<Repository<Product>>,
    prices: Arc<Repository<Price>>,
    inventory: Arc<InventoryStore>,
    fixtures: Arc<FixtureCatalog>,
    wizard: Arc<WizardStore>,
}

impl FulfillmentService {
    pub fn new(
        offerings: Arc<Repository<Offering>>,
        products: Arc<Repository<Product>>,
        prices: Arc<Repository<Price>>,
        inventory: Arc<InventoryStore>,
        fixtures: Arc<FixtureCatalog>,
        wizard: Arc<WizardStore>,
    ) -> Self {
        Self {
            offerings,
            products,
            prices,
            inventory,
            fixtures,
            wizard,
        }
    }

    /// Wizard document for an offering on top of the wizard template.
    /// `None` when the offering does not exist.
    pub async fn generate(&self, offering_id: RecordId) -> StoreResult<Option<WizardData>> {
        let Some(offering) = self.offerings.get(offering_id).await? else {
            return Ok(None);
        };
        let products = self.products.list().await?;
        let prices = self.prices.list().await?;
        let inventory = self.inventory.snapshot().await?;
        let templates = self.fixtures.device_templates().await;
        let base = self.fixtures.wizard_template().await;

        let inputs = FulfillmentInputs {
            products: &products,
            prices: &prices,
            inventory: &inventory,
            templates: &templates,
        };
        Ok(Some(generate(&offering, inputs, base)))
    }

    /// Generate and store the wizard document of an order.
    pub async fn generate_for_order(&self, order_id: RecordId, offering_id: RecordId) -> StoreResult<Option<WizardData>> {
        let Some(data) = self.generate(offering_id).await? else {
            tracing::warn!(order_id = %order_id, offering_id = %offering_id, "offering not found; wizard not generated");
            return Ok(None);
        };
        self.store(order_id, offering_id, data).await.map(Some)
    }

    /// Wizard document for a freshly placed order, stored only when its
    /// offering includes inventory-backed products.
    pub async fn provision_order(&self, order: &Order) -> StoreResult<Option<WizardData>> {
        let Some(offering_id) = order.offering_id else {
            return Ok(None);
        };
        let Some(data) = self.generate(offering_id).await? else {
            return Ok(None);
        };
        if !data.equipment_breakdown.iter().any(|l| l.allocatable) {
            tracing::debug!(order_id = %order.id, "no inventory-backed products; wizard not generated");
            return Ok(None);
        }
        self.store(order.id, offering_id, data).await.map(Some)
    }

    async fn store(&self, order_id: RecordId, offering_id: RecordId, data: WizardData) -> StoreResult<WizardData> {
        self.wizard.set(order_id, &data).await?;
        tracing::info!(
            order_id = %order_id,
            offering_id = %offering_id,
            devices = data.device_configs.len(),
            subtotal = data.equipment_subtotal,
            "wizard generated"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::StaticSeeds;
    use crate::storage::InMemoryStorage;
    use crate::SeedSource;
    use crate::Storage;
    use serde_json::json;

    fn service() -> (Arc<WizardStore>, FulfillmentService) {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let seeds: Arc<dyn SeedSource> = Arc::new(
            StaticSeeds::new()
                .with(
                    "offerings",
                    json!([{"id": 1, "name": "Branch", "components": [
                        {"productId": 10, "qty": 2, "billing": "oneOff"},
                        {"productId": 11, "qty": 1, "billing": "monthly"}
                    ]}]),
                )
                .with(
                    "products",
                    json!([
                        {"id": 10, "name": "FortiGate 60F", "sku": "FG-60F-X", "category": "networking", "priceId": "P1"},
                        {"id": 11, "name": "FortiCare", "sku": "FC-1", "category": "service", "priceId": "P2"}
                    ]),
                )
                .with("prices", json!([{"priceId": "P1", "oneOff": 900}, {"priceId": "P2", "monthly": 30}]))
                .with("inventory", json!([{"sku": "FG-60F", "name": "FortiGate 60F", "stock": 5}]))
                .with("device_templates", json!({"FG60F": {"type": "firewall", "sections": [{"title": "WAN", "fields": []}]}}))
                .with("order_wizard_data", json!({"installationServices": 250})),
        );
        let fixtures = Arc::new(FixtureCatalog::new(storage.clone(), seeds.clone()));
        let inventory = Arc::new(InventoryStore::new(storage.clone(), seeds.clone()));
        let wizard = Arc::new(WizardStore::new(storage.clone(), fixtures.clone(), inventory.clone()));
        let service = FulfillmentService::new(
            Arc::new(Repository::new(storage.clone(), seeds.clone())),
            Arc::new(Repository::new(storage.clone(), seeds.clone())),
            Arc::new(Repository::new(storage, seeds)),
            inventory,
            fixtures,
            wizard.clone(),
        );
        (wizard, service)
    }

    #[tokio::test]
    async fn generates_and_stores_for_order() {
        let (wizard, svc) = service();
        let data = svc.generate_for_order(RecordId::new(8), RecordId::new(1)).await.unwrap().unwrap();

        assert_eq!(data.equipment_subtotal, 1800.0);
        assert_eq!(data.total_order_value, 2050.0);
        assert_eq!(data.required_equipment.len(), 1);
        assert_eq!(data.device_configs.keys().collect::<Vec<_>>(), vec!["FG60F-1", "FG60F-2"]);
        assert_eq!(data.device_configs["FG60F-1"].display_name, "FortiGate 60F");

        assert_eq!(wizard.get(RecordId::new(8)).await.unwrap(), Some(data));
    }

    #[tokio::test]
    async fn provisioning_follows_the_order_offering() {
        let (wizard, svc) = service();
        let placed: Order = serde_json::from_value(json!({"id": 3, "offeringId": 1})).unwrap();
        assert!(svc.provision_order(&placed).await.unwrap().is_some());
        assert!(wizard.get(RecordId::new(3)).await.unwrap().is_some());

        let no_offering: Order = serde_json::from_value(json!({"id": 4})).unwrap();
        assert!(svc.provision_order(&no_offering).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_offering_generates_nothing() {
        let (wizard, svc) = service();
        assert!(svc.generate_for_order(RecordId::new(8), RecordId::new(99)).await.unwrap().is_none());
        assert!(wizard.get(RecordId::new(8)).await.unwrap().is_none());
    }
}
