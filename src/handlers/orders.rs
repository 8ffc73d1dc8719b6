use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{Enrichment, Order, OrderHistory, OrderedProduct, RequestedLine};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: String,
    /// Must be a positive integer.
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLineResponse {
    pub product_id: String,
    pub name: String,
    pub description: String,
    /// Decimal unit price as a string, e.g. "9.99"
    pub price: String,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub account_id: String,
    pub lines: Vec<OrderLineResponse>,
    /// Total fixed when the order was created, as a decimal string.
    pub total_price: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderHistoryResponse {
    pub orders: Vec<OrderResponse>,
    /// True when line items could not be refreshed from the catalog and show
    /// the values stored at purchase time.
    pub degraded: bool,
    pub degraded_reason: Option<String>,
}

impl From<&OrderedProduct> for OrderLineResponse {
    fn from(line: &OrderedProduct) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            description: line.description.clone(),
            price: line.price.to_string(),
            quantity: line.quantity,
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            account_id: order.account_id.clone(),
            lines: order.lines.iter().map(OrderLineResponse::from).collect(),
            total_price: order.total_price.to_string(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

impl From<&OrderHistory> for OrderHistoryResponse {
    fn from(history: &OrderHistory) -> Self {
        let degraded_reason = match &history.enrichment {
            Enrichment::Complete => None,
            Enrichment::Degraded(e) => Some(e.to_string()),
        };
        Self {
            orders: history.orders.iter().map(OrderResponse::from).collect(),
            degraded: degraded_reason.is_some(),
            degraded_reason,
        }
    }
}

/// Rejects zero, negative and oversized quantities at the boundary.
fn requested_lines(body: CreateOrderRequest) -> Result<Vec<RequestedLine>, AppError> {
    body.lines
        .into_iter()
        .map(|l| match u32::try_from(l.quantity) {
            Ok(quantity) if quantity > 0 => Ok(RequestedLine::new(l.product_id, quantity)),
            _ => Err(AppError::BadRequest(format!(
                "quantity for product {} must be a positive integer, got {}",
                l.product_id, l.quantity
            ))),
        })
        .collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /accounts/{account_id}/orders
///
/// Creates an order priced from the live catalog. Fails as a whole if the
/// account or any product cannot be resolved.
#[utoipa::path(
    post,
    path = "/accounts/{account_id}/orders",
    params(
        ("account_id" = String, Path, description = "Buyer account id"),
    ),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Malformed request"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "A requested product does not exist"),
        (status = 503, description = "Account or catalog service unreachable"),
        (status = 504, description = "Deadline exceeded"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();
    let lines = requested_lines(body.into_inner())?;

    let order = state
        .orders
        .create_order(&account_id, lines, state.deadline())
        .await?;

    Ok(HttpResponse::Created().json(OrderResponse::from(&order)))
}

/// GET /accounts/{account_id}/orders
///
/// Returns the account's orders with line items refreshed from the catalog.
/// When the catalog is unreachable the stored values are returned and
/// `degraded` is set.
#[utoipa::path(
    get,
    path = "/accounts/{account_id}/orders",
    params(
        ("account_id" = String, Path, description = "Buyer account id"),
    ),
    responses(
        (status = 200, description = "Orders of the account", body = OrderHistoryResponse),
        (status = 504, description = "Deadline exceeded"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders_for_account(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();

    let history = state
        .orders
        .list_orders_for_account(&account_id, state.deadline())
        .await?;

    Ok(HttpResponse::Ok().json(OrderHistoryResponse::from(&history)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(lines: &[(&str, i64)]) -> CreateOrderRequest {
        CreateOrderRequest {
            lines: lines
                .iter()
                .map(|(id, quantity)| OrderLineRequest {
                    product_id: id.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn positive_quantities_become_requested_lines() {
        let lines = requested_lines(request(&[("P1", 2), ("P2", 1)])).unwrap();
        assert_eq!(lines, vec![RequestedLine::new("P1", 2), RequestedLine::new("P2", 1)]);
    }

    #[test]
    fn zero_negative_and_oversized_quantities_are_rejected() {
        for quantity in [0, -3, i64::from(u32::MAX) + 1] {
            let err = requested_lines(request(&[("P1", quantity)])).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{quantity}");
        }
    }
}
