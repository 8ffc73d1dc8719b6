use std::sync::Arc;

use dotenvy::dotenv;
use order_orchestrator::application::order_service::OrderService;
use order_orchestrator::domain::ports::OrderStore;
use order_orchestrator::infrastructure::memory::{
    InMemoryAccounts, InMemoryCatalog, InMemoryOrderStore,
};
use order_orchestrator::infrastructure::order_repo::DieselOrderStore;
use order_orchestrator::{build_server, create_pool, run_migrations, AppState, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;

    let orders: Arc<dyn OrderStore> = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url)?;
            run_migrations(&pool)?;
            log::info!("Using Postgres order store");
            Arc::new(DieselOrderStore::new(pool))
        }
        None => {
            log::warn!("DATABASE_URL not set, orders are kept in memory");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    let accounts = Arc::new(InMemoryAccounts::new());
    let catalog = Arc::new(InMemoryCatalog::new());
    let service = OrderService::new(accounts.clone(), catalog.clone(), orders);

    let state = AppState {
        orders: service,
        accounts,
        catalog,
        request_timeout: config.request_timeout,
    };

    log::info!(
        "Starting server at http://{}:{} (request timeout {:?})",
        config.host,
        config.port,
        config.request_timeout
    );

    build_server(state, &config.host, config.port)?.await?;
    Ok(())
}
