//! # SweetStock API
//!
//! JSON/HTTP server in front of the inventory ledger.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SweetStock Routes                               │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌───────────────────┐ │
//! │  │  Catalog           │  │  Ledger            │  │  Reports          │ │
//! │  │                    │  │                    │  │                   │ │
//! │  │ GET/POST products  │  │ GET/POST purchases │  │ top-selling       │ │
//! │  │ GET/PUT products/id│  │ GET/POST sales     │  │ slow-moving       │ │
//! │  │ suppliers (CRUD)   │  │ GET stock          │  │ monthly-profit    │ │
//! │  │ retailers (CRUD)   │  │ GET stock/expiring │  │                   │ │
//! │  └────────────────────┘  └────────────────────┘  └───────────────────┘ │
//! │                                                                         │
//! │  GET /   GET /health                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collection paths answer with and without a trailing slash.
//!
//! ## Configuration
//! See [`config::Settings`]. Environment variables use the
//! `SWEETSTOCK__SECTION__KEY` form.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;

use axum::routing::{get, MethodRouter};
use axum::Router;
use std::sync::Arc;
use sweetstock_db::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::Settings;
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        AppState {
            db,
            settings: Arc::new(settings),
        }
    }
}

/// Builds the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    use handlers::{health, partners, products, purchases, reports, sales, stock};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health));

    let router = collection(
        router,
        "/api/products",
        get(products::list_products).post(products::create_product),
    )
    .route(
        "/api/products/{id}",
        get(products::get_product).put(products::update_product),
    );

    let router = collection(
        router,
        "/api/purchases",
        get(purchases::list_purchases).post(purchases::create_purchase),
    )
    .route("/api/purchases/{id}", get(purchases::get_purchase));

    let router = collection(
        router,
        "/api/sales",
        get(sales::list_sales).post(sales::create_sale),
    )
    .route("/api/sales/{id}", get(sales::get_sale));

    let router = collection(router, "/api/stock", get(stock::overview))
        .route("/api/stock/expiring", get(stock::expiring));

    let router = router
        .route("/api/reports/top-selling", get(reports::top_selling))
        .route("/api/reports/slow-moving", get(reports::slow_moving))
        .route("/api/reports/monthly-profit", get(reports::monthly_profit));

    let router = collection(
        router,
        "/api/suppliers",
        get(partners::list_suppliers).post(partners::create_supplier),
    )
    .route(
        "/api/suppliers/{id}",
        get(partners::get_supplier).delete(partners::delete_supplier),
    );

    let router = collection(
        router,
        "/api/retailers",
        get(partners::list_retailers).post(partners::create_retailer),
    )
    .route(
        "/api/retailers/{id}",
        get(partners::get_retailer).delete(partners::delete_retailer),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Mounts `methods` at `path` and `path/`.
fn collection(
    router: Router<AppState>,
    path: &str,
    methods: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, methods.clone())
        .route(&format!("{path}/"), methods)
}
