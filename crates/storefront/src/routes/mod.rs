//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog listing (filter query string)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit (product_id, return_to)
//! POST /cart/update            - Set quantity (product_id, quantity)
//! POST /cart/remove            - Remove entry (product_id)
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Open or resume the wizard
//! POST /checkout/continue      - Review -> shipping
//! POST /checkout/shipping      - Submit shipping form
//! POST /checkout/payment       - Submit payment form and settle
//! POST /checkout/close         - Dismiss the wizard
//! ```

pub mod cart;
pub mod checkout;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/continue", post(checkout::continue_to_shipping))
        .route("/shipping", post(checkout::submit_shipping))
        .route("/payment", post(checkout::submit_payment))
        .route("/close", post(checkout::close))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
