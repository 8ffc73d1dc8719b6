use utoipa::OpenApi;

use crate::handlers::{accounts, catalog, orders};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order Orchestrator API",
        version = "0.1.0",
        description = "Creates and lists orders priced from the live product catalog"
    ),
    paths(
        orders::create_order,
        orders::list_orders_for_account,
        accounts::create_account,
        accounts::get_account,
        accounts::list_accounts,
        catalog::put_product,
        catalog::get_product,
        catalog::list_products,
    ),
    components(schemas(
        orders::CreateOrderRequest,
        orders::OrderLineRequest,
        orders::OrderResponse,
        orders::OrderLineResponse,
        orders::OrderHistoryResponse,
        accounts::CreateAccountRequest,
        accounts::AccountResponse,
        catalog::PutProductRequest,
        catalog::ProductResponse,
    )),
    tags(
        (name = "orders", description = "Order creation and history"),
        (name = "accounts", description = "Buyer accounts"),
        (name = "catalog", description = "Product catalog"),
    )
)]
pub struct ApiDoc;
