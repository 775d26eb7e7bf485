use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_core::serde_util::opt_lenient_key;
use bss_core::{Entity, RecordId};

/// Categories whose products never consume physical stock.
const NON_STOCK_CATEGORIES: [&str; 3] = ["service", "itsm", "ai"];

/// Product specification.
///
/// A product is either physical equipment (allocated from inventory and
/// configured during provisioning) or a service/licence line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "opt_lenient_key", skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_family: Option<String>,
    /// Explicit stock flag. Absent on legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<bool>,
    /// Realisation steps, one provisioning task each.
    #[serde(default)]
    pub sequence: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Whether the product is drawn from inventory.
    ///
    /// The explicit `inventory` flag wins; otherwise anything outside the
    /// service/itsm/ai categories counts as hardware.
    pub fn is_allocatable(&self) -> bool {
        match self.inventory {
            Some(flag) => flag,
            None => {
                let category = self.category.to_lowercase();
                !NON_STOCK_CATEGORIES.contains(&category.as_str())
            }
        }
    }

    /// Normalised resource identifier used to look up a device template.
    pub fn resource_id(&self) -> String {
        if let Some(tpl) = self.device_template_id.as_deref().filter(|t| !t.is_empty()) {
            return tpl.to_uppercase();
        }
        let mut parts = self.sku.split('-');
        let head = parts.next().unwrap_or_default();
        let tail = parts.next().unwrap_or_default();
        head.chars()
            .chain(tail.chars())
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase()
    }
}

impl Entity for Product {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub fn find_product(products: &[Product], id: RecordId) -> Option<&Product> {
    products.iter().find(|p| p.id == id)
}
