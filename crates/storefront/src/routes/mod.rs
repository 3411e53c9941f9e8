//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Menu
//! GET  /api/categories             - Category list (empty on API failure)
//! GET  /api/menu?category=&q=      - Filtered menu with cart counts
//!
//! # Cart (JSON)
//! GET    /api/cart                 - Lines, totals, promo
//! POST   /api/cart/add             - Add one unit    {itemId}
//! POST   /api/cart/remove          - Remove one unit {itemId}
//! POST   /api/cart/update          - Set quantity    {itemId, quantity}
//! DELETE /api/cart                 - Empty the cart
//!
//! # Promo (rate limited)
//! POST   /api/promo/verify         - Verify a code   {code, email}
//! DELETE /api/promo                - Remove the code
//!
//! # Checkout (rate limited)
//! POST /checkout                   - Form post, 303 to the payment page
//!
//! # Order confirmation
//! GET  /order/success              - Order for the stored payment session
//! GET  /order/success/countdown    - SSE countdown back to the home page
//!
//! # Forms
//! POST /api/contact                - Contact message
//! GET  /api/careers/positions      - Open positions
//! POST /api/careers/apply          - Job application (multipart)
//! ```

pub mod careers;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod menu;
pub mod order;
pub mod promo;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use crate::middleware::{checkout_rate_limiter, promo_rate_limiter};
use crate::state::AppState;

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(menu::categories))
        .route("/menu", get(menu::index))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/update", post(cart::update))
}

/// Create the promo routes router.
///
/// Only verification is rate limited; removing a code is local.
pub fn promo_routes() -> Router<AppState> {
    Router::new()
        .route("/verify", post(promo::verify))
        .route_layer(promo_rate_limiter())
        .route("/", delete(promo::remove))
}

/// Create the careers routes router.
pub fn careers_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/apply",
            post(careers::apply).layer(DefaultBodyLimit::max(careers::APPLICATION_BODY_LIMIT)),
        )
        .route("/positions", get(careers::positions))
}

/// Create the order confirmation routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/success", get(order::success))
        .route("/success/countdown", get(order::countdown_events))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let checkout = Router::new()
        .route("/checkout", post(checkout::submit))
        .route_layer(checkout_rate_limiter());

    Router::new()
        .route("/health", get(health))
        // Menu
        .nest("/api", menu_routes())
        // Cart
        .nest("/api/cart", cart_routes())
        // Promo
        .nest("/api/promo", promo_routes())
        // Forms
        .route("/api/contact", post(contact::submit))
        .nest("/api/careers", careers_routes())
        // Checkout and confirmation
        .merge(checkout)
        .nest("/order", order_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the food API.
async fn health() -> &'static str {
    "ok"
}
