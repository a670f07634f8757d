//! Integration tests for ShopZone.
//!
//! Each test starts the real storefront router on an ephemeral port and talks
//! to it over HTTP with a cookie-keeping client, so every test is its own
//! shopper session.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopzone-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;
use shopzone_storefront::config::StorefrontConfig;
use shopzone_storefront::source::{MockProductSource, ProductSource};
use shopzone_storefront::state::AppState;

/// Confirmation window used by test servers, short enough to wait out.
pub const TEST_CONFIRMATION_MS: u64 = 200;

/// A storefront running in-process plus a client bound to one session.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront backed by the instant mock catalog.
    pub async fn new() -> Self {
        Self::with_source(Arc::new(MockProductSource::instant())).await
    }

    /// Start a storefront backed by `source`.
    pub async fn with_source(source: Arc<dyn ProductSource>) -> Self {
        let config = test_config();
        let app = shopzone_storefront::app(AppState::with_source(config, source));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return status and body.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// POST `form` to `path` and return status and body.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }
}

/// Default configuration with a short confirmation window.
pub fn test_config() -> StorefrontConfig {
    let confirmation = TEST_CONFIRMATION_MS.to_string();
    StorefrontConfig::from_vars(|key| match key {
        "SHOPZONE_CONFIRMATION_MS" => Some(confirmation.clone()),
        _ => None,
    })
    .expect("Failed to build test configuration")
}

/// Count occurrences of `needle` in `haystack`.
pub fn occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
