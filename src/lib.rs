pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Config;
pub use db::{create_pool, run_migrations, DbPool, MIGRATIONS};
pub use state::AppState;

use openapi::ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .service(
                web::scope("/accounts")
                    .route("", web::post().to(handlers::accounts::create_account))
                    .route("", web::get().to(handlers::accounts::list_accounts))
                    .route("/{id}", web::get().to(handlers::accounts::get_account))
                    .route(
                        "/{account_id}/orders",
                        web::post().to(handlers::orders::create_order),
                    )
                    .route(
                        "/{account_id}/orders",
                        web::get().to(handlers::orders::list_orders_for_account),
                    ),
            )
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::catalog::list_products))
                    .route("/{id}", web::put().to(handlers::catalog::put_product))
                    .route("/{id}", web::get().to(handlers::catalog::get_product)),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
