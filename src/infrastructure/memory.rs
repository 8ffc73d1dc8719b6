//! In-process account registry, product catalog and order store.
//!
//! The service binary uses them as its account and catalog backends (and as
//! the order store when no database is configured). Tests use the failure,
//! latency and call-recording knobs to drive the orchestrator through its
//! error paths.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::account::Account;
use crate::domain::errors::{AccountError, CatalogError, StoreError};
use crate::domain::order::Order;
use crate::domain::ports::{AccountGateway, CatalogGateway, OrderStore};
use crate::domain::product::{Pagination, Product};

/// Shared fault-injection switches.
#[derive(Debug, Default)]
struct Faults {
    unreachable: AtomicBool,
    latency_ms: AtomicU64,
}

impl Faults {
    async fn apply(&self) -> Result<(), String> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err("connection refused".to_string());
        }
        Ok(())
    }

    fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }
}

fn paginate<T>(items: impl Iterator<Item = T>, page: Pagination) -> Vec<T> {
    let skip = usize::try_from(page.skip).unwrap_or(usize::MAX);
    let take = usize::try_from(page.take).unwrap_or(usize::MAX);
    items.skip(skip).take(take).collect()
}

// ── Accounts ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryAccounts {
    accounts: RwLock<BTreeMap<String, Account>>,
    faults: Faults,
    resolve_calls: AtomicUsize,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new account under a generated id.
    pub async fn register(&self, name: impl Into<String>) -> Account {
        let account = Account::new(Uuid::new_v4().to_string(), name);
        self.insert(account.clone()).await;
        account
    }

    /// Inserts or replaces an account with a caller-chosen id.
    pub async fn insert(&self, account: Account) {
        self.accounts
            .write()
            .await
            .insert(account.id.clone(), account);
    }

    pub async fn list(&self, page: Pagination) -> Vec<Account> {
        let accounts = self.accounts.read().await;
        paginate(accounts.values().cloned(), page)
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.faults.set_unreachable(unreachable);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.faults.set_latency(latency);
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountGateway for InMemoryAccounts {
    async fn resolve(&self, id: &str) -> Result<Account, AccountError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.faults.apply().await.map_err(AccountError::Transport)?;
        self.accounts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<BTreeMap<String, Product>>,
    faults: Faults,
    record_requests: bool,
    resolve_requests: Mutex<Vec<BTreeSet<String>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog that keeps every id set passed to `resolve_by_ids`. The log
    /// is unbounded, so only tests use it.
    pub fn recording() -> Self {
        Self {
            record_requests: true,
            ..Self::default()
        }
    }

    /// Inserts or replaces a product. Negative prices are rejected.
    pub async fn upsert(&self, product: Product) -> Result<(), CatalogError> {
        if product.price < BigDecimal::from(0) {
            return Err(CatalogError::Rejected(format!(
                "price of {} must not be negative",
                product.id
            )));
        }
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
        Ok(())
    }

    pub async fn remove(&self, id: &str) -> Option<Product> {
        self.products.write().await.remove(id)
    }

    pub async fn get(&self, id: &str) -> Option<Product> {
        self.products.read().await.get(id).cloned()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.faults.set_unreachable(unreachable);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.faults.set_latency(latency);
    }

    /// Every id set passed to `resolve_by_ids`, in call order. Always empty
    /// unless built with [`InMemoryCatalog::recording`].
    pub async fn resolve_requests(&self) -> Vec<BTreeSet<String>> {
        self.resolve_requests.lock().await.clone()
    }
}

#[async_trait]
impl CatalogGateway for InMemoryCatalog {
    async fn resolve_by_ids(
        &self,
        ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, Product>, CatalogError> {
        if self.record_requests {
            self.resolve_requests.lock().await.push(ids.clone());
        }
        self.faults.apply().await.map_err(CatalogError::Transport)?;
        let products = self.products.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| products.get(id).map(|p| (id.clone(), p.clone())))
            .collect())
    }

    async fn search(&self, query: &str, page: Pagination) -> Result<Vec<Product>, CatalogError> {
        self.faults.apply().await.map_err(CatalogError::Transport)?;
        let needle = query.to_lowercase();
        let products = self.products.read().await;
        let hits = products.values().filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.description.to_lowercase().contains(&needle)
        });
        Ok(paginate(hits.cloned(), page))
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Product>, CatalogError> {
        self.faults.apply().await.map_err(CatalogError::Transport)?;
        let products = self.products.read().await;
        Ok(paginate(products.values().cloned(), page))
    }
}

// ── Orders ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
    faults: Faults,
    put_calls: AtomicUsize,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.faults.set_unreachable(unreachable);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.faults.set_latency(latency);
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn put(&self, order: &Order) -> Result<(), StoreError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.faults.apply().await.map_err(StoreError)?;
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Order>, StoreError> {
        self.faults.apply().await.map_err(StoreError)?;
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.account_id == account_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product(id: &str, name: &str, price: &str) -> Product {
        Product::new(
            id,
            name,
            format!("{name} description"),
            BigDecimal::from_str(price).expect("valid decimal"),
        )
    }

    #[tokio::test]
    async fn resolve_by_ids_returns_only_known_ids() {
        let catalog = InMemoryCatalog::recording();
        catalog.upsert(product("P1", "Widget", "1.00")).await.unwrap();
        catalog.upsert(product("P2", "Gadget", "2.00")).await.unwrap();

        let ids: BTreeSet<String> = ["P1".to_string(), "P9".to_string()].into();
        let found = catalog.resolve_by_ids(&ids).await.unwrap();

        assert_eq!(found.len(), 1);
        assert!(found.contains_key("P1"));
        assert_eq!(catalog.resolve_requests().await, vec![ids]);
    }

    #[tokio::test]
    async fn plain_catalog_keeps_no_request_log() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert(product("P1", "Widget", "1.00")).await.unwrap();

        let ids: BTreeSet<String> = ["P1".to_string()].into();
        for _ in 0..1_000 {
            catalog.resolve_by_ids(&ids).await.unwrap();
        }

        assert!(catalog.resolve_requests().await.is_empty());
    }

    #[tokio::test]
    async fn upsert_rejects_negative_price() {
        let catalog = InMemoryCatalog::new();
        let err = catalog
            .upsert(product("P1", "Widget", "-0.01"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Rejected(_)));
        assert!(catalog.get("P1").await.is_none());
    }

    #[tokio::test]
    async fn search_matches_name_or_description_case_insensitively() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert(product("P1", "Blue Widget", "1.00")).await.unwrap();
        catalog.upsert(product("P2", "Red Gadget", "2.00")).await.unwrap();
        catalog.upsert(product("P3", "Green widget", "3.00")).await.unwrap();

        let hits = catalog.search("WIDGET", Pagination::default()).await.unwrap();
        let ids: Vec<_> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P3"]);

        let second = catalog.search("widget", Pagination::new(Some(1), Some(1))).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, "P3");
    }

    #[tokio::test]
    async fn list_pages_through_products() {
        let catalog = InMemoryCatalog::new();
        for i in 0..5 {
            catalog
                .upsert(product(&format!("P{i}"), "Item", "1.00"))
                .await
                .unwrap();
        }

        let page = catalog.list(Pagination::new(Some(3), Some(3))).await.unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn unreachable_catalog_reports_transport_error() {
        let catalog = InMemoryCatalog::new();
        catalog.set_unreachable(true);
        let err = catalog.list(Pagination::default()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }

    #[tokio::test]
    async fn accounts_resolve_registered_and_reject_unknown() {
        let accounts = InMemoryAccounts::new();
        let alice = accounts.register("Alice").await;

        assert_eq!(accounts.resolve(&alice.id).await.unwrap(), alice);
        assert_eq!(
            accounts.resolve("nobody").await.unwrap_err(),
            AccountError::NotFound("nobody".to_string())
        );
        assert_eq!(accounts.resolve_calls(), 2);
    }

    #[tokio::test]
    async fn order_store_lists_by_account_in_insertion_order() {
        let store = InMemoryOrderStore::new();
        let first = Order::new("A1", vec![]);
        let other = Order::new("A2", vec![]);
        let second = Order::new("A1", vec![]);
        for o in [&first, &other, &second] {
            store.put(o).await.unwrap();
        }

        let listed = store.list_by_account("A1").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(store.put_calls(), 3);
    }

    #[tokio::test]
    async fn failing_order_store_keeps_nothing() {
        let store = InMemoryOrderStore::new();
        store.set_unreachable(true);
        assert!(store.put(&Order::new("A1", vec![])).await.is_err());
        assert!(store.is_empty().await);
    }
}
