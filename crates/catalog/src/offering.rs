//! Offerings: sellable bundles of products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_core::id::opt_id;
use bss_core::serde_util::{default_qty, lenient_f64, lenient_qty, opt_lenient_key};
use bss_core::{Entity, RecordId};

/// How a component is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BillingMode {
    #[default]
    OneOff,
    Monthly,
    Usage,
}

/// One product line inside an offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// `None` while the line is still being edited.
    #[serde(default, deserialize_with = "opt_id::deserialize")]
    pub product_id: Option<RecordId>,
    #[serde(default = "default_qty", deserialize_with = "lenient_qty")]
    pub qty: u32,
    #[serde(default)]
    pub billing: BillingMode,
}

impl Component {
    pub fn new(product_id: RecordId, qty: u32, billing: BillingMode) -> Self {
        Self {
            product_id: Some(product_id),
            qty: qty.max(1),
            billing,
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePlan {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub setup_fee: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub monthly_fee: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PricePlan {
    fn default() -> Self {
        Self {
            setup_fee: 0.0,
            monthly_fee: 0.0,
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub components: Vec<Component>,
    /// Legacy flat product list; derived from `components` on save.
    #[serde(default)]
    pub product_ids: Vec<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_plan: Option<PricePlan>,
    #[serde(default, deserialize_with = "opt_lenient_key", skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    #[serde(default)]
    pub activation_sequence: Vec<String>,
    /// Opaque workflow reference copied onto orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Offering {
    /// Components, falling back to the legacy product list (qty 1, one-off).
    pub fn effective_components(&self) -> Vec<Component> {
        if !self.components.is_empty() {
            return self.components.clone();
        }
        self.product_ids
            .iter()
            .map(|pid| Component::new(*pid, 1, BillingMode::OneOff))
            .collect()
    }

    /// Rebuild the legacy `product_ids` list from the components.
    pub fn derive_product_ids(&mut self) {
        if self.components.is_empty() {
            return;
        }
        self.product_ids = self.components.iter().filter_map(|c| c.product_id).collect();
    }

    /// Bring legacy records onto the component model.
    pub fn normalise(&mut self) {
        if self.components.is_empty() && !self.product_ids.is_empty() {
            self.components = self.effective_components();
        }
        self.derive_product_ids();
    }

    pub fn monthly_fee(&self) -> f64 {
        self.price_plan.as_ref().map(|p| p.monthly_fee).unwrap_or(0.0)
    }

    pub fn setup_fee(&self) -> f64 {
        self.price_plan.as_ref().map(|p| p.setup_fee).unwrap_or(0.0)
    }
}

impl Entity for Offering {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
