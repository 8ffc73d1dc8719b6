use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::{AccountError, CatalogError, OrderError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        let msg = e.to_string();
        match e {
            OrderError::InvalidRequest(_) => AppError::BadRequest(msg),
            OrderError::AccountUnavailable(AccountError::NotFound(_)) => AppError::NotFound(msg),
            OrderError::AccountUnavailable(AccountError::Transport(_)) => {
                AppError::Unavailable(msg)
            }
            OrderError::CatalogUnavailable(inner) => inner.into(),
            OrderError::ProductNotFound(_) => AppError::Unprocessable(msg),
            OrderError::DeadlineExceeded(_) => AppError::Timeout(msg),
            OrderError::PersistenceFailed(_) => AppError::Internal(msg),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Transport(_) => AppError::Unavailable(e.to_string()),
            CatalogError::Rejected(_) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::NotFound(_) => AppError::NotFound(e.to_string()),
            AccountError::Transport(_) => AppError::Unavailable(e.to_string()),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}
