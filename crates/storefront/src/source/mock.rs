//! Built-in catalog served without a backend.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;
use shopzone_core::{Order, OrderReceipt, Product, ProductId};
use tracing::{debug, instrument};

use super::{FetchError, OrderError, ProductSource};

/// Latency of a catalog fetch.
pub const DEFAULT_CATALOG_DELAY: Duration = Duration::from_millis(500);

/// Latency of an order submission.
pub const DEFAULT_ORDER_DELAY: Duration = Duration::from_millis(1000);

const ORDER_ID_LEN: usize = 9;

/// `(id, name, price, rating, reviews, category, image, stock)`
const CATALOG: [(i32, &str, i64, f32, u32, &str, &str, u32); 8] = [
    (1, "Wireless Bluetooth Headphones", 4999, 4.5, 2341, "Electronics", "🎧", 15),
    (2, "Smart Watch Fitness Tracker", 12499, 4.3, 1823, "Electronics", "⌚", 8),
    (3, "Laptop Backpack USB Charging", 3299, 4.7, 5621, "Bags", "🎒", 25),
    (4, "Portable Power Bank 20000mAh", 2499, 4.6, 3456, "Electronics", "🔋", 30),
    (5, "Wireless Gaming Mouse RGB", 3799, 4.4, 1234, "Electronics", "🖱️", 12),
    (6, "Mechanical Keyboard", 7499, 4.8, 2876, "Electronics", "⌨️", 7),
    (7, "USB-C Hub 7-in-1 Adapter", 2899, 4.5, 987, "Accessories", "🔌", 20),
    (8, "Noise Cancelling Earbuds", 6699, 4.6, 4532, "Electronics", "🎵", 10),
];

/// The fixed product list used when no backend is configured or reachable.
#[must_use]
pub fn fallback_catalog() -> Vec<Product> {
    CATALOG
        .iter()
        .map(
            |&(id, name, price, rating, reviews, category, image, stock)| Product {
                id: ProductId::new(id),
                name: name.to_string(),
                price: Decimal::from(price),
                rating,
                reviews,
                category: category.to_string(),
                image: image.to_string(),
                stock,
            },
        )
        .collect()
}

/// Serves [`fallback_catalog`] and accepts every order.
#[derive(Debug, Clone)]
pub struct MockProductSource {
    catalog_delay: Duration,
    order_delay: Duration,
}

impl MockProductSource {
    #[must_use]
    pub const fn new(catalog_delay: Duration, order_delay: Duration) -> Self {
        Self {
            catalog_delay,
            order_delay,
        }
    }

    /// A mock that answers immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for MockProductSource {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_DELAY, DEFAULT_ORDER_DELAY)
    }
}

#[async_trait]
impl ProductSource for MockProductSource {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        tokio::time::sleep(self.catalog_delay).await;
        Ok(fallback_catalog())
    }

    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn create_order(&self, order: &Order) -> Result<OrderReceipt, OrderError> {
        tokio::time::sleep(self.order_delay).await;
        let order_id = random_order_id();
        debug!(order_id = %order_id, total = %order.total, "Mock order accepted");
        Ok(OrderReceipt::success(order_id))
    }
}

/// Nine lowercase base-36 characters.
fn random_order_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ORDER_ID_LEN)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect()
}
