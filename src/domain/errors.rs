use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account not found: {0}")]
    NotFound(String),
    #[error("Account service unreachable: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog service unreachable: {0}")]
    Transport(String),
    #[error("Invalid product: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Order store error: {0}")]
pub struct StoreError(pub String);

/// Failure kinds of the order workflows. Every variant aborts the workflow;
/// catalog trouble while listing is reported through
/// [`Enrichment::Degraded`](crate::domain::order::Enrichment) instead.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Account unavailable: {0}")]
    AccountUnavailable(#[source] AccountError),
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[source] CatalogError),
    #[error("Products not found: {}", .0.join(", "))]
    ProductNotFound(Vec<String>),
    #[error("Persistence failed: {0}")]
    PersistenceFailed(#[source] StoreError),
    #[error("Deadline exceeded while waiting for {0}")]
    DeadlineExceeded(&'static str),
}

impl OrderError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            OrderError::InvalidRequest(_) | OrderError::ProductNotFound(_) => false,
            OrderError::AccountUnavailable(AccountError::NotFound(_)) => false,
            OrderError::AccountUnavailable(AccountError::Transport(_)) => true,
            OrderError::CatalogUnavailable(CatalogError::Rejected(_)) => false,
            OrderError::CatalogUnavailable(CatalogError::Transport(_)) => true,
            OrderError::PersistenceFailed(_) | OrderError::DeadlineExceeded(_) => true,
        }
    }
}
