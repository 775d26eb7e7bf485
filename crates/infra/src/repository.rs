//! Generic storage-backed record collection.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use bss_core::{query, DomainError, Entity, ListQuery, Page, RecordId};

use crate::error::{StoreError, StoreResult};
use crate::records::Record;
use crate::seed::SeedSource;
use crate::storage::{load_json, save_json, Storage};

/// One collection of `T`, stored as a JSON array under `T::STORAGE_KEY`.
///
/// The collection is loaded on first access: from storage when present,
/// otherwise from the `T::SEED` fixture (a missing or broken fixture yields
/// an empty collection). Each mutation is applied to a copy, written to
/// storage and only then swapped into the cache.
pub struct Repository<T: Record> {
    storage: Arc<dyn Storage>,
    seeds: Arc<dyn SeedSource>,
    cache: RwLock<Option<Vec<T>>>,
}

impl<T: Record> Repository<T> {
    pub fn new(storage: Arc<dyn Storage>, seeds: Arc<dyn SeedSource>) -> Self {
        Self {
            storage,
            seeds,
            cache: RwLock::new(None),
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<T>> {
        self.read(|records| records.to_vec()).await
    }

    pub async fn count(&self) -> StoreResult<usize> {
        self.read(|records| records.len()).await
    }

    /// Records matching `filter`, then searched, sorted and paged by `q`.
    pub async fn page<F>(&self, q: &ListQuery, filter: F) -> StoreResult<Page<T>>
    where
        F: Fn(&T) -> bool + Send + Sync,
    {
        let matching = self
            .read(|records| records.iter().filter(|&r| filter(r)).cloned().collect::<Vec<_>>())
            .await?;
        Ok(query::run(matching, q, T::SEARCH))
    }

    pub async fn get(&self, id: RecordId) -> StoreResult<Option<T>> {
        self.read(|records| records.iter().find(|r| *r.id() == id).cloned()).await
    }

    /// Fetch a record that must exist.
    pub async fn require(&self, id: RecordId) -> StoreResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    /// Insert a record, assigning the next id when it has none.
    pub async fn add(&self, mut record: T) -> StoreResult<T> {
        let now = Utc::now();
        self.write(move |records| {
            if record.id().is_assigned() {
                if records.iter().any(|r| r.id() == record.id()) {
                    return Err(DomainError::conflict(format!("{} {} already exists", T::KIND, record.id())).into());
                }
            } else {
                record.set_id(RecordId::next_after(records.iter().map(|r| *r.id())));
            }
            record.normalise(now);
            record.validate()?;
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    /// Shallow-merge `patch` into a record. The id is never changed.
    pub async fn update(&self, id: RecordId, patch: Value) -> StoreResult<T> {
        let Value::Object(patch) = patch else {
            return Err(DomainError::validation(format!("{} patch must be an object", T::KIND)).into());
        };
        let now = Utc::now();
        self.write(move |records| {
            let slot = find_slot(records, id)?;
            let mut shape = serde_json::to_value(&*slot).map_err(|e| StoreError::codec(T::STORAGE_KEY, e))?;
            if let Value::Object(fields) = &mut shape {
                fields.extend(patch);
            }
            let mut merged: T = serde_json::from_value(shape)
                .map_err(|e| DomainError::validation(format!("invalid {} update: {e}", T::KIND)))?;
            merged.set_id(id);
            merged.touch(now);
            merged.normalise(now);
            merged.validate()?;
            *slot = merged.clone();
            Ok(merged)
        })
        .await
    }

    /// Apply a typed edit to a record. Nothing is written when `edit` fails.
    pub async fn update_with<R, F>(&self, id: RecordId, edit: F) -> StoreResult<R>
    where
        F: FnOnce(&mut T) -> Result<R, DomainError> + Send,
        R: Send,
    {
        let now = Utc::now();
        self.write(move |records| {
            let slot = find_slot(records, id)?;
            let out = edit(slot)?;
            slot.set_id(id);
            slot.touch(now);
            slot.normalise(now);
            slot.validate()?;
            Ok(out)
        })
        .await
    }

    /// Remove a record; `false` when there was none.
    pub async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        self.write(move |records| {
            let before = records.len();
            records.retain(|r| *r.id() != id);
            Ok(records.len() != before)
        })
        .await
    }

    /// Replace the whole collection (bulk import).
    pub async fn replace_all(&self, mut next: Vec<T>) -> StoreResult<usize> {
        let now = Utc::now();
        assign_missing_ids(&mut next);
        for r in &mut next {
            r.normalise(now);
        }
        self.write(move |records| {
            *records = next;
            Ok(records.len())
        })
        .await
    }

    /// Drop the cache so the next access reloads from storage.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn read<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&[T]) -> R + Send,
    {
        {
            let guard = self.cache.read().await;
            if let Some(records) = guard.as_deref() {
                return Ok(f(records));
            }
        }
        let mut guard = self.cache.write().await;
        let records = self.loaded(&mut guard).await?;
        Ok(f(records))
    }

    async fn write<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> StoreResult<R> + Send,
    {
        let mut guard = self.cache.write().await;
        let records = self.loaded(&mut guard).await?;
        let mut next = records.clone();
        let out = f(&mut next)?;
        save_json(self.storage.as_ref(), T::STORAGE_KEY, &next).await?;
        *records = next;
        Ok(out)
    }

    async fn loaded<'g>(&self, slot: &'g mut Option<Vec<T>>) -> StoreResult<&'g mut Vec<T>> {
        if slot.is_none() {
            *slot = Some(self.load().await?);
        }
        Ok(slot.get_or_insert_with(Vec::new))
    }

    async fn load(&self) -> StoreResult<Vec<T>> {
        let mut stored = match load_json::<Value>(self.storage.as_ref(), T::STORAGE_KEY).await? {
            Some(value) => Some(decode_records::<T>(value).map_err(|e| StoreError::codec(T::STORAGE_KEY, e))?),
            None => None,
        };
        if T::RESEED_WHEN_EMPTY && stored.as_ref().is_some_and(Vec::is_empty) {
            stored = None;
        }

        let seeded = stored.is_none();
        let mut records = match stored {
            Some(records) => records,
            None => self.seed().await,
        };

        let now = Utc::now();
        assign_missing_ids(&mut records);
        for r in &mut records {
            r.normalise(now);
        }
        if seeded {
            save_json(self.storage.as_ref(), T::STORAGE_KEY, &records).await?;
            tracing::info!(kind = T::KIND, count = records.len(), "collection seeded");
        }
        Ok(records)
    }

    async fn seed(&self) -> Vec<T> {
        let value = match self.seeds.load(T::SEED).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::warn!(kind = T::KIND, seed = T::SEED, "seed fixture missing; starting empty");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(kind = T::KIND, seed = T::SEED, error = %err, "seed fixture unreadable; starting empty");
                return Vec::new();
            }
        };
        match decode_records(value) {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(kind = T::KIND, seed = T::SEED, %error, "seed fixture malformed; starting empty");
                Vec::new()
            }
        }
    }
}

/// Decode a JSON array one record at a time. Records that do not decode are
/// logged and skipped; anything other than an array is an error.
fn decode_records<T: Record>(value: Value) -> Result<Vec<T>, String> {
    let Value::Array(items) = value else {
        return Err("expected a JSON array".to_string());
    };
    let mut records = Vec::with_capacity(items.len());
    for (index, mut raw) in items.into_iter().enumerate() {
        T::prepare(&mut raw);
        match serde_json::from_value(raw) {
            Ok(record) => records.push(record),
            Err(error) => tracing::warn!(kind = T::KIND, index, %error, "skipping undecodable record"),
        }
    }
    Ok(records)
}

fn find_slot<T: Record>(records: &mut [T], id: RecordId) -> StoreResult<&mut T> {
    records
        .iter_mut()
        .find(|r| *r.id() == id)
        .ok_or_else(|| StoreError::not_found(T::KIND, id))
}

fn assign_missing_ids<T: Record>(records: &mut [T]) {
    let mut next = RecordId::next_after(records.iter().map(|r| *r.id()));
    for r in records.iter_mut().filter(|r| !r.id().is_assigned()) {
        r.set_id(next);
        next = RecordId::new(next.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::StaticSeeds;
    use crate::storage::InMemoryStorage;
    use bss_core::SortSpec;
    use bss_catalog::{find_price, Cfs, Price, Product};
    use bss_crm::{Customer, Ticket};
    use bss_orders::Order;
    use serde_json::json;

    fn repo<T: Record>(storage: Arc<InMemoryStorage>, seeds: StaticSeeds) -> Repository<T> {
        Repository::new(storage, Arc::new(seeds))
    }

    fn customer_seeds() -> StaticSeeds {
        StaticSeeds::new().with(
            "customers",
            json!([
                {"id": 1, "name": "Acme", "industry": "Retail", "state": "active"},
                {"id": 4, "name": "Globex", "industry": "Energy"},
                {"name": "Initech", "industry": "Software", "vip": true}
            ]),
        )
    }

    #[tokio::test]
    async fn seeds_once_then_reads_storage() {
        let storage = Arc::new(InMemoryStorage::new());
        let customers: Repository<Customer> = repo(storage.clone(), customer_seeds());

        let all = customers.list().await.unwrap();
        assert_eq!(all.iter().map(|c| c.id.get()).collect::<Vec<_>>(), vec![1, 4, 5]);
        assert_eq!(all[2].extra["vip"], json!(true));
        assert!(storage.get("bss_customers").await.unwrap().is_some());

        // A fresh repository over the same storage ignores the seeds.
        let again: Repository<Customer> = repo(storage, StaticSeeds::new());
        assert_eq!(again.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn missing_or_malformed_seed_is_empty() {
        let empty: Repository<Customer> = repo(Arc::new(InMemoryStorage::new()), StaticSeeds::new());
        assert!(empty.list().await.unwrap().is_empty());

        let broken: Repository<Customer> = repo(
            Arc::new(InMemoryStorage::new()),
            StaticSeeds::new().with("customers", json!({"not": "an array"})),
        );
        assert!(broken.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_ticket_collection_reseeds() {
        let storage = Arc::new(InMemoryStorage::with_entries([("bss_tickets", "[]"), ("bss_customers", "[]")]));
        let seeds = StaticSeeds::new()
            .with("tickets", json!([{"id": 9, "subject": "VPN down", "Status": "open"}]))
            .with("customers", json!([{"id": 1, "name": "Acme"}]));

        let tickets: Repository<Ticket> = repo(storage.clone(), seeds.clone());
        let t = tickets.list().await.unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].title(), "VPN down");
        assert_eq!(t[0].status, "OPEN");

        let customers: Repository<Customer> = repo(storage, seeds);
        assert!(customers.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_assigns_next_id_and_validates() {
        let customers: Repository<Customer> = repo(Arc::new(InMemoryStorage::new()), customer_seeds());

        let added = customers
            .add(Customer { name: "Umbrella".into(), ..Customer::default() })
            .await
            .unwrap();
        assert_eq!(added.id, RecordId::new(6));
        assert!(added.created_at.is_some());

        let err = customers.add(Customer::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));

        let dup = Customer { id: RecordId::new(1), name: "Again".into(), ..Customer::default() };
        assert!(matches!(customers.add(dup).await, Err(StoreError::Domain(DomainError::Conflict(_)))));
        assert_eq!(customers.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn update_merges_and_keeps_id() {
        let customers: Repository<Customer> = repo(Arc::new(InMemoryStorage::new()), customer_seeds());

        let updated = customers
            .update(RecordId::new(4), json!({"id": 99, "industry": "Utilities", "region": "EU"}))
            .await
            .unwrap();
        assert_eq!(updated.id, RecordId::new(4));
        assert_eq!(updated.name, "Globex");
        assert_eq!(updated.industry, "Utilities");
        assert_eq!(updated.extra["region"], json!("EU"));
        assert!(updated.last_modified.is_some());

        let missing = customers.update(RecordId::new(42), json!({})).await.unwrap_err();
        assert!(matches!(missing, StoreError::NotFound { kind: "customer", .. }));

        let invalid = customers.update(RecordId::new(4), json!({"name": "  "})).await;
        assert!(invalid.is_err());
        assert_eq!(customers.require(RecordId::new(4)).await.unwrap().name, "Globex");
    }

    #[tokio::test]
    async fn failed_typed_edit_writes_nothing() {
        let storage = Arc::new(InMemoryStorage::new());
        let customers: Repository<Customer> = repo(storage.clone(), customer_seeds());
        customers.list().await.unwrap();
        let before = storage.get("bss_customers").await.unwrap();

        let res: StoreResult<()> = customers
            .update_with(RecordId::new(1), |c| {
                c.name = "changed".into();
                Err(DomainError::invariant("nope"))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(customers.require(RecordId::new(1)).await.unwrap().name, "Acme");
        assert_eq!(storage.get("bss_customers").await.unwrap(), before);
    }

    #[tokio::test]
    async fn page_filters_searches_and_sorts() {
        let customers: Repository<Customer> = repo(Arc::new(InMemoryStorage::new()), customer_seeds());

        let q = ListQuery::page(0, 2).sorted_by(SortSpec::desc("name"));
        let page = customers.page(&q, |_| true).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.records.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["Initech", "Globex"]);

        let page = customers
            .page(&ListQuery::all().with_search("RETAIL"), |_| true)
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = customers.page(&ListQuery::all(), |c| c.id.get() > 1).await.unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn delete_and_replace_all() {
        let customers: Repository<Customer> = repo(Arc::new(InMemoryStorage::new()), customer_seeds());
        assert!(customers.delete(RecordId::new(4)).await.unwrap());
        assert!(!customers.delete(RecordId::new(4)).await.unwrap());

        let n = customers
            .replace_all(vec![
                Customer { name: "A".into(), ..Customer::default() },
                Customer { id: RecordId::new(3), name: "B".into(), ..Customer::default() },
            ])
            .await
            .unwrap();
        assert_eq!(n, 2);
        let ids: Vec<_> = customers.list().await.unwrap().iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[tokio::test]
    async fn corrupt_storage_is_a_codec_error() {
        let storage = Arc::new(InMemoryStorage::with_entries([("bss_orders", "{oops")]));
        let orders: Repository<Order> = repo(storage, StaticSeeds::new());
        assert!(matches!(orders.list().await, Err(StoreError::Codec { .. })));

        let storage = Arc::new(InMemoryStorage::with_entries([("bss_orders", r#"{"id": 1}"#)]));
        let orders: Repository<Order> = repo(storage, StaticSeeds::new());
        assert!(matches!(orders.list().await, Err(StoreError::Codec { .. })));
    }

    #[tokio::test]
    async fn undecodable_records_are_skipped() {
        let seeds = StaticSeeds::new().with(
            "customers",
            json!([
                {"id": 1, "name": "Acme"},
                {"id": {"nested": true}, "name": "Broken"},
                {"id": 2, "name": "Globex", "state": "unknown-state"},
                {"id": 3, "name": "Initech"}
            ]),
        );
        let customers: Repository<Customer> = repo(Arc::new(InMemoryStorage::new()), seeds);
        let names: Vec<_> = customers.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Acme", "Initech"]);

        let storage = Arc::new(InMemoryStorage::with_entries([(
            "bss_customers",
            r#"[{"id": 7, "name": "Umbrella"}, {"id": -1, "name": "Negative"}]"#,
        )]));
        let stored: Repository<Customer> = repo(storage, StaticSeeds::new());
        let all = stored.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, RecordId::new(7));
    }

    #[tokio::test]
    async fn numeric_price_ids_load_with_their_products() {
        let seeds = StaticSeeds::new()
            .with(
                "products",
                json!([
                    {"id": 1, "name": "FortiGate 60F", "sku": "FG-60F", "priceId": 3},
                    {"id": 2, "name": "FortiSwitch 124F", "sku": "FS-124F", "priceId": "P-FS"}
                ]),
            )
            .with("prices", json!([{"id": 3, "priceId": 3, "oneOff": 900}]));
        let storage = Arc::new(InMemoryStorage::new());
        let products: Repository<Product> = repo(storage.clone(), seeds.clone());
        let prices: Repository<Price> = repo(storage, seeds);

        let products = products.list().await.unwrap();
        assert_eq!(products.len(), 2);
        let prices = prices.list().await.unwrap();
        let price = find_price(&prices, products[0].price_id.as_deref()).unwrap();
        assert_eq!(price.one_off, 900.0);
    }

    #[tokio::test]
    async fn string_cfs_ids_become_codes() {
        let seeds = StaticSeeds::new().with(
            "cfs",
            json!([
                {"id": 4, "name": "SD-WAN"},
                {"id": "CFS-7", "name": "Managed Wi-Fi"},
                {"id": "2", "name": "Security Monitoring"}
            ]),
        );
        let cfs: Repository<Cfs> = repo(Arc::new(InMemoryStorage::new()), seeds);
        let all = cfs.list().await.unwrap();
        assert_eq!(all.len(), 3);

        let wifi = all.iter().find(|c| c.name == "Managed Wi-Fi").unwrap();
        assert_eq!(wifi.cfs_code.as_deref(), Some("CFS-7"));
        assert_eq!(wifi.id, RecordId::new(5));
        assert_eq!(all.iter().find(|c| c.name == "Security Monitoring").unwrap().id, RecordId::new(2));
    }
}
