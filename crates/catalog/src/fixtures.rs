//! Read-only reference data shipped with the console.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Order status badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub code: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Network resource (device inventory entry shown in the resource catalog).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Static marketing pages, section name → items.
pub type DolphinPages = BTreeMap<String, Vec<Value>>;

/// Customer detail sheets keyed by customer id.
pub type CustomerDetails = BTreeMap<String, Value>;

pub fn status_by_code<'a>(statuses: &'a [OrderStatus], code: &str) -> Option<&'a OrderStatus> {
    statuses.iter().find(|s| s.code == code)
}

pub fn resource_by_id<'a>(resources: &'a [Resource], id: &Value) -> Option<&'a Resource> {
    resources.iter().find(|r| &r.id == id)
}
