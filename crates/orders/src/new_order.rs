use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_core::id::opt_id;
use bss_core::serde_util::opt_date;
use bss_core::{DomainError, DomainResult, RecordId};

use crate::{OrderItem, OrderStage};

fn default_order_type() -> String {
    "new".to_string()
}

/// New-order form as submitted by the console.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default, deserialize_with = "opt_id::deserialize")]
    pub customer_id: Option<RecordId>,
    #[serde(default, deserialize_with = "opt_id::deserialize")]
    pub offering_id: Option<RecordId>,
    #[serde(default = "default_order_type")]
    pub order_type: String,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default, with = "opt_date")]
    pub contract_start: Option<NaiveDate>,
    #[serde(default, with = "opt_date")]
    pub contract_end: Option<NaiveDate>,
    #[serde(default, with = "opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub stage: Option<OrderStage>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewOrder {
    pub fn new(customer_id: RecordId, offering_id: RecordId) -> Self {
        Self {
            customer_id: Some(customer_id),
            offering_id: Some(offering_id),
            order_type: default_order_type(),
            ..Self::default()
        }
    }

    /// Customer and offering are both required.
    pub fn validate(&self) -> DomainResult<(RecordId, RecordId)> {
        let customer = self
            .customer_id
            .filter(RecordId::is_assigned)
            .ok_or_else(|| DomainError::validation("customer is required"))?;
        let offering = self
            .offering_id
            .filter(RecordId::is_assigned)
            .ok_or_else(|| DomainError::validation("offering is required"))?;
        Ok((customer, offering))
    }
}

/// Contract number for a new order: `ORD-` plus the last six digits of the
/// epoch milliseconds.
pub fn contract_number(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().rem_euclid(1_000_000);
    format!("ORD-{millis:06}")
}
