//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page
//! GET  /health                 - Health check
//!
//! # Catalog (HTMX fragments)
//! GET  /products               - Catalog fragment (categories + grid)
//! POST /search                 - Set search term (returns catalog fragment)
//! POST /category               - Select category (returns catalog fragment)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel fragment
//! POST /cart/toggle            - Open/close the panel (returns panel)
//! POST /cart/add               - Add to cart (returns count, triggers cart-updated)
//! POST /cart/update            - Change quantity by delta (returns panel)
//! POST /cart/remove            - Remove item (returns panel)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Wishlist (HTMX fragments)
//! POST /wishlist/toggle        - Add/remove (returns count, triggers wishlist-updated)
//! GET  /wishlist/count         - Wishlist count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Place the order (returns panel with confirmation)
//! ```

pub mod cart;
pub mod home;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/toggle", post(cart::toggle))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(wishlist::toggle))
        .route("/count", get(wishlist::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        // Catalog
        .route("/products", get(products::index))
        .route("/search", post(products::search))
        .route("/category", post(products::category))
        // Cart
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        // Wishlist
        .nest("/wishlist", wishlist_routes())
}
