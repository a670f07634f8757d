//! Failure-swallowing wrapper around another product source.

use async_trait::async_trait;
use chrono::Utc;
use shopzone_core::{Order, OrderReceipt, Product};

use super::{FetchError, OrderError, ProductSource, fallback_catalog};

/// Wraps a source so that it never fails.
///
/// Catalog errors are replaced by [`fallback_catalog`], and order errors by a
/// successful receipt with a `MOCK-<epoch millis>` id. A receipt the inner
/// source did return is passed through untouched, whatever its status. Each substitution is
/// logged at `warn`, which also reports it to Sentry.
#[derive(Debug, Clone)]
pub struct FallbackSource<S> {
    inner: S,
}

impl<S> FallbackSource<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ProductSource> ProductSource for FallbackSource<S> {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        match self.inner.fetch_products().await {
            Ok(products) => Ok(products),
            Err(e) => {
                tracing::warn!(error = %e, "Using fallback catalog");
                Ok(fallback_catalog())
            }
        }
    }

    async fn create_order(&self, order: &Order) -> Result<OrderReceipt, OrderError> {
        match self.inner.create_order(order).await {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                let receipt =
                    OrderReceipt::success(format!("MOCK-{}", Utc::now().timestamp_millis()));
                tracing::warn!(
                    error = %e,
                    order_id = %receipt.order_id,
                    "Order submission failed, synthesizing receipt"
                );
                Ok(receipt)
            }
        }
    }
}
