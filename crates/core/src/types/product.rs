//! Catalog products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};

/// Highest rating a product can carry.
pub const MAX_RATING: u8 = 5;

/// A purchasable product as served by the product source.
///
/// Products are immutable once loaded; the cart and wishlist hold copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable, unique product identifier.
    pub id: ProductId,
    pub name: String,
    /// Unit price in the storefront currency's standard unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Average rating between 0 and 5.
    pub rating: f32,
    /// Number of reviews behind the rating.
    pub reviews: u32,
    pub category: String,
    /// Glyph shown in place of a product photo.
    pub image: String,
    /// Units in stock. Informational only; the cart does not clamp to it.
    pub stock: u32,
}

impl Product {
    /// Unit price in the given currency.
    #[must_use]
    pub const fn unit_price(&self, currency_code: CurrencyCode) -> Price {
        Price::new(self.price, currency_code)
    }

    /// Number of filled stars, `floor(rating)` clamped to `0..=5`.
    #[must_use]
    pub fn filled_stars(&self) -> u8 {
        if !self.rating.is_finite() || self.rating <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // Clamped to 0..=5 before the cast
        let stars = self.rating.floor().min(f32::from(MAX_RATING)) as u8;
        stars
    }

    /// Five-star strip such as `★★★★☆`.
    #[must_use]
    pub fn rating_stars(&self) -> String {
        let filled = usize::from(self.filled_stars());
        let empty = usize::from(MAX_RATING) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }

    /// Case-insensitive substring match against the product name.
    #[must_use]
    pub fn name_contains(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}
