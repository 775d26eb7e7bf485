//! Order placement, listing and lifecycle.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use bss_catalog::{Offering, Product};
use bss_core::RecordId;
use bss_crm::Customer;
use bss_orders::{NewOrder, Order, OrderStage, OrderView};

use crate::error::StoreResult;
use crate::repository::Repository;

pub struct OrderService {
    orders: Arc<Repository<Order>>,
    offerings: Arc<Repository<Offering>>,
    products: Arc<Repository<Product>>,
    customers: Arc<Repository<Customer>>,
}

impl OrderService {
    pub fn new(
        orders: Arc<Repository<Order>>,
        offerings: Arc<Repository<Offering>>,
        products: Arc<Repository<Product>>,
        customers: Arc<Repository<Customer>>,
    ) -> Self {
        Self {
            orders,
            offerings,
            products,
            customers,
        }
    }

    pub fn repository(&self) -> &Arc<Repository<Order>> {
        &self.orders
    }

    /// Validate the form, snapshot the offering onto the order and store it.
    pub async fn place(&self, form: NewOrder) -> StoreResult<Order> {
        let (customer_id, offering_id) = form.validate()?;
        let offering = self.offerings.get(offering_id).await?;
        let products = self.products.list().await?;
        let customer_name = self.customers.get(customer_id).await?.map(|c| c.name);

        let order = Order::place(
            RecordId::default(),
            form,
            offering.as_ref(),
            &products,
            customer_name,
            Utc::now(),
        )?;
        let order = self.orders.add(order).await?;
        tracing::info!(
            order_id = %order.id,
            customer_id = %customer_id,
            offering_id = %offering_id,
            contract = %order.contract_number,
            tasks = order.provisioning.len(),
            "order placed"
        );
        Ok(order)
    }

    pub async fn get(&self, id: RecordId) -> StoreResult<Option<Order>> {
        self.orders.get(id).await
    }

    /// Every order with its computed totals.
    pub async fn views(&self) -> StoreResult<Vec<OrderView>> {
        let now = Utc::now();
        Ok(self
            .orders
            .list()
            .await?
            .into_iter()
            .map(|o| OrderView::new(o, now))
            .collect())
    }

    /// Orders whose id, contract number or customer name contains `term`.
    pub async fn search(&self, term: &str) -> StoreResult<Vec<OrderView>> {
        Ok(self
            .views()
            .await?
            .into_iter()
            .filter(|v| v.order.matches_search(term))
            .collect())
    }

    pub async fn update(&self, id: RecordId, patch: Value) -> StoreResult<Order> {
        self.orders.update(id, patch).await
    }

    pub async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        self.orders.delete(id).await
    }

    /// Comment stamped with the order's current stage.
    pub async fn add_comment(&self, id: RecordId, text: &str) -> StoreResult<Order> {
        let now = Utc::now();
        self.orders
            .update_with(id, |o| {
                let stage = o.stage;
                o.add_comment(text, stage, now)?;
                Ok(o.clone())
            })
            .await
    }

    pub async fn advance_stage(&self, id: RecordId) -> StoreResult<OrderStage> {
        let stage = self.orders.update_with(id, Order::advance_stage).await?;
        tracing::info!(order_id = %id, stage = %stage, "order advanced");
        Ok(stage)
    }

    pub async fn change_stage(&self, id: RecordId, to: OrderStage) -> StoreResult<()> {
        self.orders.update_with(id, |o| o.change_stage(to)).await?;
        tracing::info!(order_id = %id, stage = %to, "order stage changed");
        Ok(())
    }

    pub async fn complete_activation_step(&self, id: RecordId, index: usize) -> StoreResult<Order> {
        self.orders
            .update_with(id, |o| {
                o.complete_activation_step(index)?;
                Ok(o.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::StaticSeeds;
    use crate::storage::InMemoryStorage;
    use crate::{SeedSource, Storage, StoreError};
    use bss_core::DomainError;
    use serde_json::json;

    fn service() -> OrderService {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let seeds: Arc<dyn SeedSource> = Arc::new(
            StaticSeeds::new()
                .with(
                    "orders",
                    json!([{"id": 4, "customerId": 1, "offeringId": 2, "contractNumber": "ORD-000004",
                            "customerName": "Acme", "stage": "delivery", "createdAt": "2024-01-02T00:00:00Z",
                            "items": [{"name": "x", "total": 40}, {"name": "y", "total": 2.5}]}]),
                )
                .with("customers", json!([{"id": 1, "name": "Acme"}, {"id": 2, "name": "Globex"}]))
                .with(
                    "offerings",
                    json!([{"id": 2, "name": "Branch", "activationSequence": ["Allocate hardware", "Go live"],
                            "workflowId": "wf-1", "components": [{"productId": 7, "qty": 1}]}]),
                )
                .with("products", json!([{"id": 7, "name": "FortiGate", "sku": "FG-60F", "sequence": ["procure", "install"]}])),
        );
        OrderService::new(
            Arc::new(Repository::new(storage.clone(), seeds.clone())),
            Arc::new(Repository::new(storage.clone(), seeds.clone())),
            Arc::new(Repository::new(storage.clone(), seeds.clone())),
            Arc::new(Repository::new(storage, seeds)),
        )
    }

    #[tokio::test]
    async fn place_snapshots_offering_and_customer() {
        let svc = service();
        let order = svc.place(NewOrder::new(RecordId::new(2), RecordId::new(2))).await.unwrap();

        assert_eq!(order.id, RecordId::new(5));
        assert_eq!(order.customer_name.as_deref(), Some("Globex"));
        assert_eq!(order.activation_sequence, vec!["Allocate hardware", "Go live"]);
        assert_eq!(order.workflow_id, Some(json!("wf-1")));
        assert_eq!(order.provisioning.len(), 2);
        assert!(order.contract_number.starts_with("ORD-"));
        assert_eq!(order.stage, OrderStage::Prospect);
    }

    #[tokio::test]
    async fn place_requires_customer_and_offering() {
        let svc = service();
        let err = svc.place(NewOrder::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
        assert_eq!(svc.views().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn views_and_search() {
        let svc = service();
        let views = svc.views().await.unwrap();
        assert_eq!(views[0].total_value, 42.5);

        assert_eq!(svc.search("acme").await.unwrap().len(), 1);
        assert_eq!(svc.search("000004").await.unwrap().len(), 1);
        assert!(svc.search("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn activation_guards_stage_changes() {
        let svc = service();
        let id = svc.place(NewOrder::new(RecordId::new(1), RecordId::new(2))).await.unwrap().id;

        svc.change_stage(id, OrderStage::Activation).await.unwrap();
        assert!(svc.advance_stage(id).await.is_err());
        assert!(svc.change_stage(id, OrderStage::Delivery).await.is_err());

        let o = svc.complete_activation_step(id, 1).await.unwrap();
        assert!(o.activation_complete());
        assert_eq!(svc.advance_stage(id).await.unwrap(), OrderStage::Delivery);

        let o = svc.add_comment(id, "  shipped  ").await.unwrap();
        assert_eq!(o.comments[0].text, "shipped");
        assert_eq!(o.comments[0].stage, OrderStage::Delivery);
        assert!(o.last_modified.is_some());
    }

    #[tokio::test]
    async fn patch_update_and_delete() {
        let svc = service();
        let o = svc.update(RecordId::new(4), json!({"notes": "rush"})).await.unwrap();
        assert_eq!(o.notes, "rush");
        assert!(svc.delete(RecordId::new(4)).await.unwrap());
        assert!(svc.get(RecordId::new(4)).await.unwrap().is_none());
    }
}
