//! JSON-over-HTTP product source.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use shopzone_core::{Order, OrderReceipt, Product};
use tracing::{debug, instrument};
use url::Url;

use super::{FetchError, OrderError, ProductSource};

/// Longest slice of a response body echoed into logs.
const LOGGED_BODY_CHARS: usize = 500;

/// Product source backed by a REST API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct HttpProductSource {
    inner: Arc<HttpProductSourceInner>,
}

struct HttpProductSourceInner {
    client: reqwest::Client,
    products_url: String,
    orders_url: String,
    token: Option<SecretString>,
}

impl HttpProductSource {
    /// Create a source rooted at `base_url` (e.g. `http://localhost:8080/api`).
    #[must_use]
    pub fn new(base_url: &Url, token: Option<SecretString>) -> Self {
        let base = base_url.as_str().trim_end_matches('/');
        Self {
            inner: Arc::new(HttpProductSourceInner {
                client: reqwest::Client::new(),
                products_url: format!("{base}/products"),
                orders_url: format!("{base}/orders"),
                token,
            }),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

impl std::fmt::Debug for HttpProductSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProductSource")
            .field("products_url", &self.inner.products_url)
            .field("orders_url", &self.inner.orders_url)
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    #[instrument(skip(self), fields(url = %self.inner.products_url))]
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        let response = self
            .authorize(self.inner.client.get(&self.inner.products_url))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body),
                "Product source returned non-success status"
            );
            return Err(FetchError::Status(status.as_u16()));
        }

        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %truncate(&body), "Failed to parse product list");
            e
        })?;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self, order), fields(url = %self.inner.orders_url, lines = order.items.len()))]
    async fn create_order(&self, order: &Order) -> Result<OrderReceipt, OrderError> {
        let response = self
            .authorize(self.inner.client.post(&self.inner.orders_url))
            .json(order)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // A rejection that carries a receipt is an answer, not a failure
            if let Ok(receipt) = serde_json::from_str::<OrderReceipt>(&body) {
                tracing::warn!(
                    status = %status,
                    order_id = %receipt.order_id,
                    order_status = %receipt.status,
                    "Order endpoint rejected the order"
                );
                return Ok(receipt);
            }
            tracing::error!(
                status = %status,
                body = %truncate(&body),
                "Order endpoint returned non-success status"
            );
            return Err(OrderError::Status(status.as_u16()));
        }

        let receipt: OrderReceipt = serde_json::from_str(&body)?;
        debug!(order_id = %receipt.order_id, status = %receipt.status, "Order submitted");
        Ok(receipt)
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}
