//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Products
//! GET  /api/products            - Product listing (?category=espresso|coldbrew|pastry|all)
//! GET  /api/products/{id}       - Product detail
//!
//! # Cart
//! GET  /api/cart                - Cart contents, item count and total
//! GET  /api/cart/count          - Item count only
//! POST /api/cart/add            - Add one unit      { "product_id": 1 }
//! POST /api/cart/remove         - Remove a line     { "product_id": 1 }
//! POST /api/cart/update         - Change quantity   { "product_id": 1, "delta": -1 }
//! POST /api/cart/clear          - Empty the cart    { "confirm": true }
//! POST /api/cart/checkout       - Check out; cart is cleared after the configured delay
//!
//! # Notifications
//! GET  /api/notifications       - Recent cart events (?since=<sequence>)
//! ```

pub mod cart;
pub mod products;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::events::Notification;
use crate::state::AppState;

/// Create the full application router with state attached.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the API routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::index))
        .route("/api/products/{id}", get(products::show))
        .route("/api/cart", get(cart::show))
        .route("/api/cart/count", get(cart::count))
        .route("/api/cart/add", post(cart::add))
        .route("/api/cart/remove", post(cart::remove))
        .route("/api/cart/update", post(cart::update))
        .route("/api/cart/clear", post(cart::clear))
        .route("/api/cart/checkout", post(cart::checkout))
        .route("/api/notifications", get(notifications))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Notification query parameters.
#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    pub since: Option<u64>,
}

/// Recent cart notifications, oldest first.
async fn notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Json<Vec<Notification>> {
    let log = state.notifications();
    Json(query.since.map_or_else(|| log.recent(), |since| log.since(since)))
}
