use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_catalog::{find_product, Offering, Product};
use bss_core::id::opt_id;
use bss_core::serde_util::{lenient_f64, opt_date};
use bss_core::{DomainError, DomainResult, Entity, RecordId};

use crate::{contract_number, NewOrder, OrderStage};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub qty: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unit_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderComment {
    pub text: String,
    pub stage: OrderStage,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

/// One realisation step of one product on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningTask {
    pub product_id: RecordId,
    pub sku: String,
    pub step_name: String,
    /// 1-based position within the product's sequence.
    pub sequence: u32,
    #[serde(default)]
    pub status: TaskStatus,
}

fn default_status() -> String {
    "draft".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "opt_id::deserialize")]
    pub customer_id: Option<RecordId>,
    #[serde(default, deserialize_with = "opt_id::deserialize")]
    pub offering_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub order_type: String,
    #[serde(default)]
    pub contract_number: String,
    #[serde(default, with = "opt_date")]
    pub contract_start: Option<NaiveDate>,
    #[serde(default, with = "opt_date")]
    pub contract_end: Option<NaiveDate>,
    #[serde(default, with = "opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub stage: OrderStage,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub comments: Vec<OrderComment>,
    #[serde(default)]
    pub workflow_id: Option<Value>,
    #[serde(default)]
    pub provisioning: Vec<ProvisioningTask>,
    /// Snapshot of the offering's activation steps taken at placement.
    #[serde(default)]
    pub activation_sequence: Vec<String>,
    /// Number of activation steps completed.
    #[serde(default)]
    pub activation_index: usize,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Build a new order from a validated form.
    ///
    /// The offering's activation sequence and workflow are copied onto the
    /// order and one provisioning task is derived per product realisation
    /// step. A missing offering or product just yields empty derivations.
    pub fn place(
        id: RecordId,
        form: NewOrder,
        offering: Option<&Offering>,
        products: &[Product],
        customer_name: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (customer_id, offering_id) = form.validate()?;

        let mut provisioning = Vec::new();
        if let Some(off) = offering {
            for comp in off.effective_components() {
                let Some(product) = comp.product_id.and_then(|pid| find_product(products, pid)) else {
                    continue;
                };
                provisioning.extend(product.sequence.iter().enumerate().map(|(i, step)| {
                    ProvisioningTask {
                        product_id: product.id,
                        sku: product.sku.clone(),
                        step_name: step.clone(),
                        sequence: i as u32 + 1,
                        status: TaskStatus::Pending,
                    }
                }));
            }
        }

        let number = form
            .contract_number
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| contract_number(now));

        Ok(Self {
            id,
            customer_id: Some(customer_id),
            offering_id: Some(offering_id),
            customer_name,
            order_type: form.order_type,
            contract_number: number,
            contract_start: form.contract_start,
            contract_end: form.contract_end,
            due_date: form.due_date,
            notes: form.notes,
            stage: form.stage.unwrap_or_default(),
            status: form.status.filter(|s| !s.is_empty()).unwrap_or_else(default_status),
            items: form.items,
            comments: Vec::new(),
            workflow_id: offering.and_then(|o| o.workflow_id.clone()),
            provisioning,
            activation_sequence: offering.map(|o| o.activation_sequence.clone()).unwrap_or_default(),
            activation_index: 0,
            created_at: now,
            last_modified: None,
            extra: form.extra,
        })
    }

    pub fn activation_complete(&self) -> bool {
        self.activation_index >= self.activation_sequence.len()
    }

    /// Move to the next stage. Leaving activation requires every activation
    /// step to be complete.
    pub fn advance_stage(&mut self) -> DomainResult<OrderStage> {
        let next = self
            .stage
            .next()
            .ok_or_else(|| DomainError::invariant("closed orders cannot advance"))?;
        if self.stage == OrderStage::Activation && !self.activation_complete() {
            return Err(DomainError::invariant(
                "finish all activation steps before moving to delivery",
            ));
        }
        self.stage = next;
        Ok(next)
    }

    /// Jump to any stage. Entering delivery requires every activation step to
    /// be complete.
    pub fn change_stage(&mut self, to: OrderStage) -> DomainResult<()> {
        if to == OrderStage::Delivery && !self.activation_complete() {
            return Err(DomainError::invariant(
                "cannot enter delivery until activation steps complete",
            ));
        }
        self.stage = to;
        Ok(())
    }

    /// Tick activation step `index` (and, implicitly, every step before it).
    pub fn complete_activation_step(&mut self, index: usize) -> DomainResult<()> {
        if self.stage != OrderStage::Activation {
            return Err(DomainError::invariant(
                "activation steps can only be completed in the activation stage",
            ));
        }
        if index >= self.activation_sequence.len() {
            return Err(DomainError::validation(format!("no activation step {index}")));
        }
        self.activation_index = self.activation_index.max(index + 1);
        Ok(())
    }

    pub fn add_comment(&mut self, text: &str, stage: OrderStage, now: DateTime<Utc>) -> DomainResult<()> {
        DomainError::require_text("comment", text)?;
        self.comments.push(OrderComment {
            text: text.trim().to_string(),
            stage,
            date: now,
        });
        Ok(())
    }

    pub fn is_billable(&self) -> bool {
        self.stage.is_billable()
    }

    /// Sum of the line item totals.
    pub fn total_value(&self) -> f64 {
        self.items.iter().map(|i| i.total).sum()
    }

    /// Case-insensitive match on id, contract number or customer name.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        self.id.to_string().contains(&term)
            || self.contract_number.to_lowercase().contains(&term)
            || self
                .customer_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&term))
    }
}

impl Entity for Order {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
