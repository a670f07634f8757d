//! ShopZone Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Modules
//!
//! - [`source`] - Where products come from and where orders go
//! - [`controller`] - Per-session catalog, cart, wishlist and checkout
//! - [`routes`] - HTMX handlers and templates
//! - [`state`] - Shared state mapping sessions to controllers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod controller;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod source;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, header::CACHE_CONTROL},
    middleware as axum_middleware,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use state::AppState;

/// Build the storefront router with its full middleware stack.
///
/// Sentry layers are left to the binary, which owns the Sentry client.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::request_id_middleware))
                .layer(axum_middleware::from_fn(
                    middleware::security_headers_middleware,
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the product source.
async fn health() -> &'static str {
    "ok"
}
