use std::collections::BTreeSet;
use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CatalogGateway;
use crate::domain::product::{Pagination, Product};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PutProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Non-negative decimal price as a string, e.g. "9.99"
    pub price: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductQuery {
    /// Free-text search over name and description.
    pub query: Option<String>,
    /// Comma-separated product ids to resolve.
    pub ids: Option<String>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
}

/// PUT /products/{id}
///
/// Inserts or replaces a catalog product.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = String, Path, description = "Product id"),
    ),
    request_body = PutProductRequest,
    responses(
        (status = 200, description = "Product stored", body = ProductResponse),
        (status = 400, description = "Invalid name or price"),
    ),
    tag = "catalog"
)]
pub async fn put_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PutProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("product name must not be empty".to_string()));
    }
    let price = BigDecimal::from_str(&body.price)
        .map_err(|e| AppError::BadRequest(format!("Invalid price '{}': {}", body.price, e)))?;

    let product = Product::new(id, body.name, body.description, price);
    state.catalog.upsert(product.clone()).await?;
    log::info!("Stored product {} at {}", product.id, product.price);

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = String, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    match state.catalog.get(&id).await {
        Some(product) => Ok(HttpResponse::Ok().json(ProductResponse::from(product))),
        None => Err(AppError::NotFound(format!("Product not found: {}", id))),
    }
}

/// GET /products
///
/// `query` searches, `ids` resolves an explicit id set, neither lists the
/// catalog page by page. `query` and `ids` cannot be combined.
#[utoipa::path(
    get,
    path = "/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductResponse>),
        (status = 400, description = "Both query and ids given"),
        (status = 503, description = "Catalog unreachable"),
    ),
    tag = "catalog"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = Pagination::new(params.skip, params.take);
    let search = params.query.filter(|q| !q.trim().is_empty());
    let ids: BTreeSet<String> = params
        .ids
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect();

    let products = match (search, ids.is_empty()) {
        (Some(_), false) => {
            return Err(AppError::BadRequest(
                "query and ids cannot be combined".to_string(),
            ))
        }
        (Some(q), true) => state.catalog.search(&q, page).await?,
        (None, false) => {
            let mut found: Vec<Product> =
                state.catalog.resolve_by_ids(&ids).await?.into_values().collect();
            found.sort_by(|a, b| a.id.cmp(&b.id));
            found
        }
        (None, true) => state.catalog.list(page).await?,
    };

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
