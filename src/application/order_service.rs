use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::time::{timeout_at, Instant};

use crate::domain::errors::OrderError;
use crate::domain::order::{Enrichment, Order, OrderHistory, OrderedProduct, RequestedLine};
use crate::domain::ports::{AccountGateway, CatalogGateway, OrderStore};
use crate::domain::product::Product;

/// Coordinates the account registry, the catalog and the order store.
///
/// Holds no state of its own, so clones can serve any number of concurrent
/// calls. Each downstream call is attempted once and bounded by the caller's
/// deadline.
#[derive(Clone)]
pub struct OrderService {
    accounts: Arc<dyn AccountGateway>,
    catalog: Arc<dyn CatalogGateway>,
    orders: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(
        accounts: Arc<dyn AccountGateway>,
        catalog: Arc<dyn CatalogGateway>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            accounts,
            catalog,
            orders,
        }
    }

    /// Validates the buyer and every requested product, snapshots current
    /// prices into a new order and persists it. Nothing is written unless
    /// every check passes.
    ///
    /// A `DeadlineExceeded` returned while waiting for the store does not
    /// mean the order was not written: a write already handed to the store
    /// may still commit. Retrying after that error can create a second order.
    pub async fn create_order(
        &self,
        account_id: &str,
        lines: Vec<RequestedLine>,
        deadline: Instant,
    ) -> Result<Order, OrderError> {
        let ids = validate_request(account_id, &lines)?;
        debug!("Resolving account {} and {} products", account_id, ids.len());

        let account_check = async {
            within(deadline, "account service", self.accounts.resolve(account_id))
                .await
                .and_then(|r| r.map_err(OrderError::AccountUnavailable))
        };
        let catalog_lookup = async {
            within(deadline, "catalog service", self.catalog.resolve_by_ids(&ids))
                .await
                .and_then(|r| r.map_err(OrderError::CatalogUnavailable))
        };
        let (_, products) = tokio::try_join!(account_check, catalog_lookup).map_err(|e| {
            warn!("Order for account {} rejected: {}", account_id, e);
            e
        })?;

        let order = Order::new(account_id, snapshot_lines(&lines, &products)?);

        if Instant::now() >= deadline {
            return Err(OrderError::DeadlineExceeded("order store"));
        }
        within(deadline, "order store", self.orders.put(&order))
            .await?
            .map_err(|e| {
                warn!("Failed to persist order {}: {}", order.id, e);
                OrderError::PersistenceFailed(e)
            })?;

        info!(
            "Created order {} for account {} ({} lines, total {})",
            order.id,
            order.account_id,
            order.lines.len(),
            order.total_price
        );
        Ok(order)
    }

    /// Returns the stored orders of an account with line items re-enriched
    /// from the live catalog. Stored totals are never recomputed. If the
    /// catalog cannot be read the snapshots are returned as they are and the
    /// history is marked degraded.
    pub async fn list_orders_for_account(
        &self,
        account_id: &str,
        deadline: Instant,
    ) -> Result<OrderHistory, OrderError> {
        if account_id.trim().is_empty() {
            return Err(OrderError::InvalidRequest(
                "account id must not be empty".to_string(),
            ));
        }

        let mut orders = within(deadline, "order store", self.orders.list_by_account(account_id))
            .await?
            .map_err(OrderError::PersistenceFailed)?;

        let ids: BTreeSet<String> = orders
            .iter()
            .flat_map(|o| o.product_ids())
            .map(str::to_owned)
            .collect();
        if ids.is_empty() {
            return Ok(OrderHistory {
                orders,
                enrichment: Enrichment::Complete,
            });
        }

        let enrichment =
            match within(deadline, "catalog service", self.catalog.resolve_by_ids(&ids)).await? {
                Ok(products) => {
                    enrich(&mut orders, &products);
                    Enrichment::Complete
                }
                Err(e) => {
                    warn!(
                        "Catalog unavailable, returning {} stored orders of {} unenriched: {}",
                        orders.len(),
                        account_id,
                        e
                    );
                    Enrichment::Degraded(e)
                }
            };

        debug!("Listed {} orders for account {}", orders.len(), account_id);
        Ok(OrderHistory { orders, enrichment })
    }
}

async fn within<F: Future>(
    deadline: Instant,
    waiting_for: &'static str,
    call: F,
) -> Result<F::Output, OrderError> {
    timeout_at(deadline, call)
        .await
        .map_err(|_| OrderError::DeadlineExceeded(waiting_for))
}

/// Rejects malformed requests and returns the exact id set to resolve.
fn validate_request(
    account_id: &str,
    lines: &[RequestedLine],
) -> Result<BTreeSet<String>, OrderError> {
    if account_id.trim().is_empty() {
        return Err(OrderError::InvalidRequest(
            "account id must not be empty".to_string(),
        ));
    }
    if lines.is_empty() {
        return Err(OrderError::InvalidRequest(
            "order must contain at least one line".to_string(),
        ));
    }

    let mut ids = BTreeSet::new();
    for line in lines {
        if line.product_id.trim().is_empty() {
            return Err(OrderError::InvalidRequest(
                "product id must not be empty".to_string(),
            ));
        }
        if line.quantity == 0 {
            return Err(OrderError::InvalidRequest(format!(
                "quantity for product {} must be positive",
                line.product_id
            )));
        }
        if !ids.insert(line.product_id.clone()) {
            return Err(OrderError::InvalidRequest(format!(
                "product {} is requested more than once",
                line.product_id
            )));
        }
    }
    Ok(ids)
}

fn snapshot_lines(
    lines: &[RequestedLine],
    products: &HashMap<String, Product>,
) -> Result<Vec<OrderedProduct>, OrderError> {
    let missing: Vec<String> = lines
        .iter()
        .filter(|l| !products.contains_key(&l.product_id))
        .map(|l| l.product_id.clone())
        .collect();
    if !missing.is_empty() {
        warn!("Products missing from catalog: {:?}", missing);
        return Err(OrderError::ProductNotFound(missing));
    }

    Ok(lines
        .iter()
        .filter_map(|l| {
            products
                .get(&l.product_id)
                .map(|p| OrderedProduct::snapshot(p, l.quantity))
        })
        .collect())
}

fn enrich(orders: &mut [Order], products: &HashMap<String, Product>) {
    for line in orders.iter_mut().flat_map(|o| o.lines.iter_mut()) {
        if let Some(product) = products.get(&line.product_id) {
            line.refresh_display(product);
        }
    }
}
