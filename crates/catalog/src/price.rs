use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_core::serde_util::{lenient_f64, lenient_key};
use bss_core::{Entity, RecordId};

fn default_currency() -> String {
    "USD".to_string()
}

/// Price record referenced by products and offerings through `price_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_key")]
    pub price_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub one_off: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub monthly: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub usage: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Price {
    fn default() -> Self {
        Self {
            id: RecordId::default(),
            price_id: String::new(),
            name: String::new(),
            one_off: 0.0,
            monthly: 0.0,
            usage: 0.0,
            currency: default_currency(),
            extra: Map::new(),
        }
    }
}

impl Price {
    /// Per-unit price of an equipment line: the one-off amount. Recurring
    /// and usage charges are not equipment prices.
    pub fn unit_price(&self) -> f64 {
        self.one_off
    }
}

impl Entity for Price {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Look up a price by its business key.
pub fn find_price<'a>(prices: &'a [Price], price_id: Option<&str>) -> Option<&'a Price> {
    let key = price_id.filter(|k| !k.is_empty())?;
    prices.iter().find(|p| p.price_id == key)
}
