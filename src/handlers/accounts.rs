use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::account::Account;
use crate::domain::ports::AccountGateway;
use crate::domain::product::Pagination;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PageParams {
    /// Number of entries to skip. Defaults to 0.
    pub skip: Option<u64>,
    /// Page size. Defaults to 100, maximum 100.
    pub take: Option<u64>,
}

/// POST /accounts
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account registered", body = AccountResponse),
        (status = 400, description = "Empty name"),
    ),
    tag = "accounts"
)]
pub async fn create_account(
    state: web::Data<AppState>,
    body: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, AppError> {
    let name = body.into_inner().name;
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("account name must not be empty".to_string()));
    }

    let account = state.accounts.register(name).await;
    log::info!("Registered account {}", account.id);

    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// GET /accounts/{id}
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(
        ("id" = String, Path, description = "Account id"),
    ),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 404, description = "Account not found"),
    ),
    tag = "accounts"
)]
pub async fn get_account(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let account = state.accounts.resolve(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

/// GET /accounts
#[utoipa::path(
    get,
    path = "/accounts",
    params(PageParams),
    responses(
        (status = 200, description = "Page of accounts", body = Vec<AccountResponse>),
    ),
    tag = "accounts"
)]
pub async fn list_accounts(
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let accounts = state
        .accounts
        .list(Pagination::new(params.skip, params.take))
        .await;

    let body: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
