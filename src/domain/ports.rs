use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use super::account::Account;
use super::errors::{AccountError, CatalogError, StoreError};
use super::order::Order;
use super::product::{Pagination, Product};

#[async_trait]
pub trait AccountGateway: Send + Sync + 'static {
    async fn resolve(&self, id: &str) -> Result<Account, AccountError>;
}

/// Catalog reads. Each lookup mode is its own operation so callers never rely
/// on an empty argument meaning "everything".
#[async_trait]
pub trait CatalogGateway: Send + Sync + 'static {
    /// Returns the subset of `ids` that exist; missing ids are simply absent.
    async fn resolve_by_ids(
        &self,
        ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, Product>, CatalogError>;

    async fn search(&self, query: &str, page: Pagination) -> Result<Vec<Product>, CatalogError>;

    async fn list(&self, page: Pagination) -> Result<Vec<Product>, CatalogError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    async fn put(&self, order: &Order) -> Result<(), StoreError>;
    /// Orders of `account_id` in the order they were put.
    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Order>, StoreError>;
}
