//! Product sources: where the catalog comes from and where orders go.
//!
//! # Architecture
//!
//! - [`ProductSource`] is the seam between the storefront and whatever backs it
//! - [`MockProductSource`] serves the built-in catalog with artificial latency
//! - [`HttpProductSource`] talks JSON to a real backend over `reqwest`
//! - [`FallbackSource`] wraps any source and swaps failures for the built-in
//!   catalog and a synthesized order receipt
//!
//! Every call returns a `Result`, so a real backend's outages reach the
//! controller. Wrapping a source in [`FallbackSource`] opts back into the
//! "always succeed" behaviour for demos.
//!
//! # Wire format
//!
//! ```text
//! GET  {base}/products  -> [{"id":1,"name":"...","price":4999,"rating":4.5,
//!                            "reviews":2341,"category":"...","image":"🎧","stock":15}]
//! POST {base}/orders    <- {"items":[{...product, "quantity":2}],"total":9998,
//!                           "timestamp":"2026-01-02T03:04:05Z"}
//!                       -> {"orderId":"k3j9x0a1b","status":"success"}
//! ```

mod fallback;
mod http;
mod mock;

pub use fallback::FallbackSource;
pub use http::HttpProductSource;
pub use mock::{MockProductSource, fallback_catalog};

use std::sync::Arc;

use async_trait::async_trait;
use shopzone_core::{Order, OrderReceipt, Product};
use thiserror::Error;

use crate::config::SourceConfig;

/// Supplies the catalog and accepts orders.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch the full product list.
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError>;

    /// Submit an order built from a cart snapshot.
    async fn create_order(&self, order: &Order) -> Result<OrderReceipt, OrderError>;
}

/// Errors that can occur while fetching the catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Product source returned HTTP {0}")]
    Status(u16),

    /// The response body was not a product list.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur while submitting an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Order endpoint returned HTTP {0}")]
    Status(u16),

    /// The response body was not an order receipt.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Build the product source described by `config`.
#[must_use]
pub fn from_config(config: &SourceConfig) -> Arc<dyn ProductSource> {
    if config.use_mock_data {
        tracing::info!("Serving the built-in catalog");
        return Arc::new(MockProductSource::new(
            config.catalog_delay,
            config.order_delay,
        ));
    }

    tracing::info!(
        api_base_url = %config.api_base_url,
        fallback = config.fallback_on_error,
        "Using HTTP product source"
    );
    let http = HttpProductSource::new(&config.api_base_url, config.api_token.clone());
    if config.fallback_on_error {
        Arc::new(FallbackSource::new(http))
    } else {
        Arc::new(http)
    }
}
