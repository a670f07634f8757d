//! Orders submitted at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartLine};
use super::status::OrderStatus;

/// A snapshot of the cart taken when the shopper checks out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub items: Vec<CartLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Order {
    /// Build an order from the current cart contents.
    #[must_use]
    pub fn from_cart(cart: &Cart, timestamp: DateTime<Utc>) -> Self {
        Self {
            items: cart.lines().to_vec(),
            total: cart.total(),
            timestamp,
        }
    }
}

/// What the product source answers to an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub status: OrderStatus,
}

impl OrderReceipt {
    #[must_use]
    pub fn success(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            status: OrderStatus::Success,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, OrderStatus::Success)
    }
}
