//! End-to-end tests for the storefront router.
//!
//! Each test owns a fresh server and session, so tests run in parallel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use shopzone_core::{Order, OrderReceipt, OrderStatus, Product};
use shopzone_integration_tests::{TEST_CONFIRMATION_MS, TestContext, occurrences};
use shopzone_storefront::source::{
    FetchError, OrderError, ProductSource, fallback_catalog,
};

const CARD: &str = "class=\"product-card\"";

/// Serves the standard catalog but never confirms an order.
struct PendingSource;

#[async_trait]
impl ProductSource for PendingSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        Ok(fallback_catalog())
    }

    async fn create_order(&self, _order: &Order) -> Result<OrderReceipt, OrderError> {
        Ok(OrderReceipt {
            order_id: "held-1".to_string(),
            status: OrderStatus::Pending,
        })
    }
}

// ============================================================================
// Health & Page
// ============================================================================

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_home_renders_catalog_and_sets_session_cookie() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .client
        .get(ctx.url("/"))
        .send()
        .await
        .expect("GET / failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("shopzone_session="), "cookie: {cookie}");
    assert!(resp.headers().contains_key("content-security-policy"));

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("ShopZone"));
    assert_eq!(occurrences(&body, CARD), 8);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_lists_all_products_in_order() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(occurrences(&body, CARD), 8);
    let headphones = body.find("Wireless Bluetooth Headphones");
    let earbuds = body.find("Noise Cancelling Earbuds");
    assert!(headphones < earbuds);
    assert!(body.contains("₹4,999"));
    assert!(body.contains("★★★★☆"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.post("/search", &[("q", "MOUSE")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(occurrences(&body, CARD), 1);
    assert!(body.contains("Wireless Gaming Mouse RGB"));

    // The filter sticks to the session
    let (_, body) = ctx.get("/products").await;
    assert_eq!(occurrences(&body, CARD), 1);
}

#[tokio::test]
async fn test_search_without_matches() {
    let ctx = TestContext::new().await;
    let (_, body) = ctx.post("/search", &[("q", "xyz")]).await;
    assert_eq!(occurrences(&body, CARD), 0);
    assert!(body.contains("No products found"));
}

#[tokio::test]
async fn test_category_filter() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.post("/category", &[("category", "Bags")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(occurrences(&body, CARD), 1);
    assert!(body.contains("Laptop Backpack USB Charging"));
    assert!(body.contains("aria-pressed=\"true\">Bags<"));

    let (_, body) = ctx.post("/category", &[("category", "All")]).await;
    assert_eq!(occurrences(&body, CARD), 8);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_twice_merges_into_one_line() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.post("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(status, StatusCode::OK);
    let (_, badge) = ctx.post("/cart/add", &[("product_id", "1")]).await;
    assert!(badge.contains(">2<"), "badge: {badge}");

    ctx.post("/cart/toggle", &[]).await;
    let (_, panel) = ctx.get("/cart").await;
    assert_eq!(occurrences(&panel, "class=\"cart-item\""), 1);
    assert!(panel.contains("₹9,998.00"));

    let (_, panel) = ctx.post("/cart/remove", &[("product_id", "1")]).await;
    assert!(panel.contains("Your cart is empty"));
    let (_, badge) = ctx.get("/cart/count").await;
    assert!(badge.trim().is_empty(), "badge: {badge}");
}

#[tokio::test]
async fn test_add_returns_trigger_header() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .form(&[("product_id", "4")])
        .send()
        .await
        .expect("POST /cart/add failed");

    assert_eq!(
        resp.headers().get("hx-trigger").and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );
}

#[tokio::test]
async fn test_quantity_never_drops_below_one() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &[("product_id", "2")]).await;
    ctx.post("/cart/toggle", &[]).await;

    let (_, panel) = ctx
        .post("/cart/update", &[("product_id", "2"), ("delta", "-1")])
        .await;
    assert!(panel.contains("class=\"cart-item-quantity\">1<"));

    let (_, panel) = ctx
        .post("/cart/update", &[("product_id", "2"), ("delta", "1")])
        .await;
    assert!(panel.contains("class=\"cart-item-quantity\">2<"));
    assert!(panel.contains("₹24,998.00"));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.post("/cart/add", &[("product_id", "99")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_panel_toggles() {
    let ctx = TestContext::new().await;
    let (_, panel) = ctx.post("/cart/toggle", &[]).await;
    assert!(panel.contains("Your Cart"));
    let (_, panel) = ctx.post("/cart/toggle", &[]).await;
    assert!(panel.trim().is_empty());
}

// ============================================================================
// Wishlist
// ============================================================================

#[tokio::test]
async fn test_wishlist_toggle_is_its_own_inverse() {
    let ctx = TestContext::new().await;

    let (status, badge) = ctx.post("/wishlist/toggle", &[("product_id", "3")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(badge.contains(">1<"), "badge: {badge}");
    let (_, grid) = ctx.get("/products").await;
    assert_eq!(occurrences(&grid, "Remove from wishlist"), 1);

    ctx.post("/wishlist/toggle", &[("product_id", "3")]).await;
    let (_, badge) = ctx.get("/wishlist/count").await;
    assert!(!badge.contains("badge"), "badge: {badge}");
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_clears_cart_and_confirmation_expires() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &[("product_id", "6")]).await;
    ctx.post("/cart/toggle", &[]).await;

    let (status, panel) = ctx.post("/checkout", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(panel.contains("Order placed successfully!"));

    let (_, badge) = ctx.get("/cart/count").await;
    assert!(badge.trim().is_empty());

    // A second checkout while the confirmation is up is refused
    let (status, _) = ctx.post("/checkout", &[]).await;
    assert_eq!(status, StatusCode::CONFLICT);

    tokio::time::sleep(Duration::from_millis(TEST_CONFIRMATION_MS * 3)).await;
    let (_, panel) = ctx.get("/cart").await;
    assert!(panel.trim().is_empty(), "panel: {panel}");
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_conflict() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.post("/checkout", &[]).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_checkout_not_accepted_keeps_cart() {
    let ctx = TestContext::with_source(Arc::new(PendingSource)).await;
    ctx.post("/cart/add", &[("product_id", "1")]).await;

    let (status, _) = ctx.post("/checkout", &[]).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (_, badge) = ctx.get("/cart/count").await;
    assert!(badge.contains(">1<"), "badge: {badge}");
}
