use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_core::{DomainError, DomainResult, Entity, RecordId};

/// Fields inspected by the customer list's free-text search.
pub const CUSTOMER_SEARCH_FIELDS: &[&str] = &[
    "name",
    "email",
    "company",
    "phone",
    "industry",
    "accountManager",
    "state",
];

/// Customer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerState {
    #[default]
    Prospect,
    Validated,
    Active,
    Inactive,
}

impl CustomerState {
    pub const ALL: [CustomerState; 4] = [
        CustomerState::Prospect,
        CustomerState::Validated,
        CustomerState::Active,
        CustomerState::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerState::Prospect => "prospect",
            CustomerState::Validated => "validated",
            CustomerState::Active => "active",
            CustomerState::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub account_manager: String,
    #[serde(default)]
    pub state: CustomerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    pub fn validate(&self) -> DomainResult<()> {
        DomainError::require_text("name", &self.name)
    }
}

impl Entity for Customer {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        let mut c = Customer::default();
        assert!(matches!(c.validate(), Err(DomainError::Validation(_))));
        c.name = "Acme Corp".into();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn state_defaults_to_prospect_and_serializes_lowercase() {
        let c: Customer = serde_json::from_str(r#"{"id":2,"name":"Globex","accountManager":"Sam"}"#).unwrap();
        assert_eq!(c.state, CustomerState::Prospect);
        assert_eq!(c.account_manager, "Sam");
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["state"], "prospect");
        assert_eq!(v["accountManager"], "Sam");
    }
}
