//! Per-order wizard documents (`orderWizardData_<orderId>`).

use std::sync::Arc;

use bss_core::RecordId;
use bss_orders::Order;
use bss_provisioning::{configured_families, select_steps, WizardData, WizardNavigator};

use crate::error::{StoreError, StoreResult};
use crate::keys;
use crate::services::{FixtureCatalog, InventoryStore};
use crate::storage::{load_json, save_json, Storage};

/// Wizard state of every order. Each call names the order it works on.
pub struct WizardStore {
    storage: Arc<dyn Storage>,
    fixtures: Arc<FixtureCatalog>,
    inventory: Arc<InventoryStore>,
}

impl WizardStore {
    pub fn new(storage: Arc<dyn Storage>, fixtures: Arc<FixtureCatalog>, inventory: Arc<InventoryStore>) -> Self {
        Self {
            storage,
            fixtures,
            inventory,
        }
    }

    /// Existing document, or a copy of the wizard template stored for the order.
    pub async fn init_for_order(&self, order_id: RecordId) -> StoreResult<WizardData> {
        if let Some(data) = self.get(order_id).await? {
            return Ok(data);
        }
        let data = self.fixtures.wizard_template().await;
        self.set(order_id, &data).await?;
        tracing::debug!(order_id = %order_id, "wizard initialised from template");
        Ok(data)
    }

    pub async fn get(&self, order_id: RecordId) -> StoreResult<Option<WizardData>> {
        load_json(self.storage.as_ref(), &keys::wizard(order_id)).await
    }

    pub async fn set(&self, order_id: RecordId, data: &WizardData) -> StoreResult<()> {
        save_json(self.storage.as_ref(), &keys::wizard(order_id), data).await
    }

    /// Edit the order's document and save it.
    pub async fn edit<R, F>(&self, order_id: RecordId, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut WizardData) -> R + Send,
        R: Send,
    {
        let mut data = self
            .get(order_id)
            .await?
            .ok_or_else(|| StoreError::not_found("wizard", order_id))?;
        let out = f(&mut data);
        self.set(order_id, &data).await?;
        Ok(out)
    }

    /// Allocate one required equipment line from inventory.
    ///
    /// On success the line is marked allocated; when stock is short it is
    /// marked not available. `false` for unknown lines and shortages.
    pub async fn allocate(&self, order_id: RecordId, name: &str) -> StoreResult<bool> {
        let mut data = self
            .get(order_id)
            .await?
            .ok_or_else(|| StoreError::not_found("wizard", order_id))?;
        let Some(need) = data.required_item(name).map(|i| i.need.max(1)) else {
            return Ok(false);
        };

        let ok = self.inventory.allocate(name, need).await?;
        if ok {
            data.mark_allocated(name);
        } else {
            data.mark_unavailable(name);
        }
        self.set(order_id, &data).await?;
        Ok(ok)
    }

    /// Wizard pages for an order, from its activation sequence and the device
    /// families configured in its document.
    pub async fn navigator(&self, order: &Order) -> StoreResult<WizardNavigator> {
        let data = self.init_for_order(order.id).await?;
        let families = configured_families(&data);
        Ok(WizardNavigator::new(select_steps(&order.activation_sequence, &families)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::StaticSeeds;
    use crate::storage::InMemoryStorage;
    use bss_provisioning::{EquipmentStatus, WizardStep};
    use serde_json::json;

    fn store() -> (Arc<InMemoryStorage>, WizardStore) {
        let storage = Arc::new(InMemoryStorage::new());
        let seeds: Arc<StaticSeeds> = Arc::new(
            StaticSeeds::new()
                .with(
                    "order_wizard_data",
                    json!({
                        "installationServices": 500,
                        "requiredEquipment": [
                            {"name": "FortiGate 100F", "need": 2, "stock": 3, "status": "Available"},
                            {"name": "FortiAP 231G", "need": 4, "stock": 1, "status": "Low Stock"}
                        ],
                        "deviceConfigs": {"FG100F": {"type": "firewall", "sections": []}}
                    }),
                )
                .with(
                    "inventory",
                    json!([
                        {"sku": "FG-100F", "name": "FortiGate 100F", "stock": 3},
                        {"sku": "FAP-231G", "name": "FortiAP 231G", "stock": 1}
                    ]),
                ),
        );
        let fixtures = Arc::new(FixtureCatalog::new(storage.clone(), seeds.clone()));
        let inventory = Arc::new(InventoryStore::new(storage.clone(), seeds));
        (storage.clone(), WizardStore::new(storage, fixtures, inventory))
    }

    #[tokio::test]
    async fn init_copies_template_once() {
        let (storage, wiz) = store();
        let id = RecordId::new(12);
        assert!(wiz.get(id).await.unwrap().is_none());

        let data = wiz.init_for_order(id).await.unwrap();
        assert_eq!(data.installation_services, 500.0);
        assert!(storage.get("orderWizardData_12").await.unwrap().is_some());

        wiz.edit(id, |d| d.set_allocation_notes(vec!["rack 3".into()])).await.unwrap();
        let again = wiz.init_for_order(id).await.unwrap();
        assert_eq!(again.allocation_notes, vec!["rack 3"]);

        // Other orders start from the template, not from order 12.
        assert!(wiz.init_for_order(RecordId::new(13)).await.unwrap().allocation_notes.is_empty());
    }

    #[tokio::test]
    async fn allocation_goes_through_inventory() {
        let (_, wiz) = store();
        let id = RecordId::new(1);
        wiz.init_for_order(id).await.unwrap();

        assert!(wiz.allocate(id, "FortiGate 100F").await.unwrap());
        assert!(!wiz.allocate(id, "FortiAP 231G").await.unwrap());
        assert!(!wiz.allocate(id, "Unknown").await.unwrap());

        let data = wiz.get(id).await.unwrap().unwrap();
        assert_eq!(data.required_equipment[0].status, EquipmentStatus::Allocated);
        assert_eq!(data.required_equipment[1].status, EquipmentStatus::NotAvailable);
        assert_eq!(data.allocated_equipment.len(), 1);
        assert_eq!(data.pending_device_count(), 4);
        assert_eq!(wiz.inventory.available_stock("FortiGate 100F").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn edits_need_an_initialised_document() {
        let (_, wiz) = store();
        let err = wiz.edit(RecordId::new(5), |_| ()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "wizard", .. }));
    }

    #[tokio::test]
    async fn navigator_uses_configured_families() {
        let (_, wiz) = store();
        let order: Order = serde_json::from_value(json!({
            "id": 3,
            "activationSequence": ["Allocate hardware", "Configure devices"]
        }))
        .unwrap();
        let nav = wiz.navigator(&order).await.unwrap();
        assert_eq!(
            nav.steps(),
            &[
                WizardStep::OrderReview,
                WizardStep::InventoryAllocation,
                WizardStep::FirewallConfiguration,
                WizardStep::TestingValidation,
                WizardStep::FinalValidation,
                WizardStep::GoLive,
            ]
        );
    }
}
