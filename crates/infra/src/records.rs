//! Persisted record types and how each one is stored.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use bss_catalog::{Cfs, Offering, Price, Product, Rfs};
use bss_core::{DomainResult, Entity, RecordId, SearchScope};
use bss_crm::{Customer, Ticket, CUSTOMER_SEARCH_FIELDS};
use bss_orders::Order;

use crate::keys;

/// A record kept in a [`Repository`](crate::Repository) collection.
pub trait Record: Entity<Id = RecordId> + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human name used in errors and logs.
    const KIND: &'static str;
    const STORAGE_KEY: &'static str;
    /// Seed fixture name.
    const SEED: &'static str;
    const SEARCH: SearchScope = SearchScope::AllFields;
    /// Re-seed when the stored collection is an empty array.
    const RESEED_WHEN_EMPTY: bool = false;

    fn set_id(&mut self, id: RecordId);

    /// Adjust one raw stored or seeded record before it is decoded.
    fn prepare(_raw: &mut Value) {}

    /// Fill defaults on load and before every write.
    fn normalise(&mut self, _now: DateTime<Utc>) {}

    /// Stamp a modification.
    fn touch(&mut self, _now: DateTime<Utc>) {}

    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }
}

impl Record for Customer {
    const KIND: &'static str = "customer";
    const STORAGE_KEY: &'static str = keys::CUSTOMERS;
    const SEED: &'static str = keys::seeds::CUSTOMERS;
    const SEARCH: SearchScope = SearchScope::Fields(CUSTOMER_SEARCH_FIELDS);

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn normalise(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = Some(now);
    }

    fn validate(&self) -> DomainResult<()> {
        Customer::validate(self)
    }
}

impl Record for Ticket {
    const KIND: &'static str = "ticket";
    const STORAGE_KEY: &'static str = keys::TICKETS;
    const SEED: &'static str = keys::seeds::TICKETS;
    const RESEED_WHEN_EMPTY: bool = true;

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn normalise(&mut self, now: DateTime<Utc>) {
        Ticket::normalise(self, now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = Some(now);
    }
}

impl Record for Product {
    const KIND: &'static str = "product";
    const STORAGE_KEY: &'static str = keys::PRODUCTS;
    const SEED: &'static str = keys::seeds::PRODUCTS;

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn normalise(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
        self.last_modified.get_or_insert(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = Some(now);
    }
}

impl Record for Offering {
    const KIND: &'static str = "offering";
    const STORAGE_KEY: &'static str = keys::OFFERINGS;
    const SEED: &'static str = keys::seeds::OFFERINGS;

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn normalise(&mut self, now: DateTime<Utc>) {
        Offering::normalise(self);
        self.created_at.get_or_insert(now);
        self.last_modified.get_or_insert(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = Some(now);
    }
}

impl Record for Price {
    const KIND: &'static str = "price";
    const STORAGE_KEY: &'static str = keys::PRICES;
    const SEED: &'static str = keys::seeds::PRICES;

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn normalise(&mut self, _now: DateTime<Utc>) {
        if self.price_id.is_empty() && self.id.is_assigned() {
            self.price_id = self.id.to_string();
        }
        if self.currency.is_empty() {
            self.currency = "USD".to_string();
        }
    }
}

impl Record for Cfs {
    const KIND: &'static str = "cfs";
    const STORAGE_KEY: &'static str = keys::CFS;
    const SEED: &'static str = keys::seeds::CFS;

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    /// A non-numeric `id` is a service code: it moves to `cfsCode` (unless
    /// one is set) and the record is numbered like any record without an id.
    fn prepare(raw: &mut Value) {
        let Some(obj) = raw.as_object_mut() else {
            return;
        };
        let code = match obj.get("id") {
            Some(Value::String(s)) if s.trim().parse::<u64>().is_err() => s.trim().to_string(),
            _ => return,
        };
        obj.remove("id");
        let has_code = obj
            .get("cfsCode")
            .and_then(Value::as_str)
            .is_some_and(|c| !c.trim().is_empty());
        if !has_code && !code.is_empty() {
            obj.insert("cfsCode".to_string(), Value::String(code));
        }
    }

    fn normalise(&mut self, now: DateTime<Utc>) {
        self.last_modified.get_or_insert(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = Some(now);
    }
}

impl Record for Rfs {
    const KIND: &'static str = "rfs";
    const STORAGE_KEY: &'static str = keys::RFS;
    const SEED: &'static str = keys::seeds::RFS;

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn normalise(&mut self, now: DateTime<Utc>) {
        self.last_modified.get_or_insert(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = Some(now);
    }
}

impl Record for Order {
    const KIND: &'static str = "order";
    const STORAGE_KEY: &'static str = keys::ORDERS;
    const SEED: &'static str = keys::seeds::ORDERS;
    const SEARCH: SearchScope = SearchScope::Fields(&["id", "contractNumber", "customerName"]);
    const RESEED_WHEN_EMPTY: bool = true;

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = Some(now);
    }
}
