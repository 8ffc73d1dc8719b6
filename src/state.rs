use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::application::order_service::OrderService;
use crate::infrastructure::memory::{InMemoryAccounts, InMemoryCatalog};

/// Shared handler state. Cloned once per actix worker.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub accounts: Arc<InMemoryAccounts>,
    pub catalog: Arc<InMemoryCatalog>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Deadline for a workflow starting now.
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }
}
