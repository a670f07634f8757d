//! Per-session storefront state.
//!
//! [`ShopState`] is a single immutable record holding everything a shopper's
//! session knows: the loaded catalog, cart, wishlist, filters, whether the cart
//! panel is open, and where checkout stands. Each user action is a transition
//! that takes the current record and returns the next one.
//!
//! ```text
//! catalog:  Idle -> Loading -> Ready
//!                          \-> Failed
//! checkout: Idle -> Submitting -> Confirmed(receipt) -> Idle
//!                            \-> Idle (not accepted / submission failed)
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{
    Cart, CatalogStatus, Category, Filter, Order, OrderReceipt, Product, ProductId, Wishlist,
};

/// Where the checkout flow currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    /// An order has been handed to the product source and not yet answered.
    Submitting,
    /// The order was accepted; the confirmation is showing.
    Confirmed(OrderReceipt),
}

/// Why a checkout could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutRejected {
    #[error("cart is empty")]
    EmptyCart,
    #[error("an order is already being submitted")]
    InFlight,
    #[error("the previous order confirmation is still showing")]
    ConfirmationPending,
}

/// Everything one shopper's session holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopState {
    catalog_status: CatalogStatus,
    products: Vec<Product>,
    cart: Cart,
    wishlist: Wishlist,
    filter: Filter,
    cart_open: bool,
    checkout: CheckoutPhase,
}

impl ShopState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    #[must_use]
    pub fn begin_loading(mut self) -> Self {
        self.catalog_status = CatalogStatus::Loading;
        self
    }

    /// Replace the product list and mark the catalog ready.
    #[must_use]
    pub fn catalog_loaded(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self.catalog_status = CatalogStatus::Ready;
        self
    }

    /// Mark the catalog as failed, keeping whatever products were loaded before.
    #[must_use]
    pub fn catalog_failed(mut self) -> Self {
        self.catalog_status = CatalogStatus::Failed;
        self
    }

    // =========================================================================
    // Filters
    // =========================================================================

    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.filter.search_term = term.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.filter.category = category;
        self
    }

    // =========================================================================
    // Cart and wishlist
    // =========================================================================

    #[must_use]
    pub fn add_to_cart(mut self, product: &Product) -> Self {
        self.cart.add(product);
        self
    }

    #[must_use]
    pub fn remove_from_cart(mut self, id: ProductId) -> Self {
        self.cart.remove(id);
        self
    }

    /// Change a line's quantity by `delta`, clamped to a minimum of one.
    #[must_use]
    pub fn adjust_quantity(mut self, id: ProductId, delta: i64) -> Self {
        self.cart.adjust_quantity(id, delta);
        self
    }

    #[must_use]
    pub fn toggle_wishlist(mut self, product: &Product) -> Self {
        self.wishlist.toggle(product);
        self
    }

    #[must_use]
    pub fn toggle_cart_panel(mut self) -> Self {
        self.cart_open = !self.cart_open;
        self
    }

    #[must_use]
    pub fn with_cart_panel(mut self, open: bool) -> Self {
        self.cart_open = open;
        self
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Start a checkout, returning the submitting state and the order to send.
    ///
    /// Only one checkout may be in progress, and a new one cannot start while
    /// the previous confirmation is still on screen.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutRejected`] if the cart is empty or another checkout is
    /// submitting or confirming.
    pub fn begin_checkout(&self, at: DateTime<Utc>) -> Result<(Self, Order), CheckoutRejected> {
        match self.checkout {
            CheckoutPhase::Submitting => return Err(CheckoutRejected::InFlight),
            CheckoutPhase::Confirmed(_) => return Err(CheckoutRejected::ConfirmationPending),
            CheckoutPhase::Idle => {}
        }
        if self.cart.is_empty() {
            return Err(CheckoutRejected::EmptyCart);
        }

        let order = Order::from_cart(&self.cart, at);
        let mut next = self.clone();
        next.checkout = CheckoutPhase::Submitting;
        Ok((next, order))
    }

    /// The source accepted `order`: take its lines out of the cart and show the
    /// confirmation.
    ///
    /// Anything added to the cart while the order was submitting stays.
    #[must_use]
    pub fn order_placed(mut self, order: &Order, receipt: OrderReceipt) -> Self {
        self.cart.discard_ordered(&order.items);
        self.checkout = CheckoutPhase::Confirmed(receipt);
        self
    }

    /// The order was not accepted: back to idle with the cart untouched.
    #[must_use]
    pub fn checkout_abandoned(mut self) -> Self {
        if self.checkout == CheckoutPhase::Submitting {
            self.checkout = CheckoutPhase::Idle;
        }
        self
    }

    /// Hide the confirmation for `order_id` and close the cart panel.
    ///
    /// A stale dismissal for a different order leaves the state unchanged.
    #[must_use]
    pub fn dismiss_confirmation(mut self, order_id: &str) -> Self {
        if matches!(&self.checkout, CheckoutPhase::Confirmed(receipt) if receipt.order_id == order_id)
        {
            self.checkout = CheckoutPhase::Idle;
            return self.with_cart_panel(false);
        }
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[must_use]
    pub const fn catalog_status(&self) -> CatalogStatus {
        self.catalog_status
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products matching the current search term and category, in catalog order.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<Product> {
        self.filter.apply(&self.products)
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        Category::from_catalog(&self.products)
    }

    #[must_use]
    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    #[must_use]
    pub const fn cart_open(&self) -> bool {
        self.cart_open
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutPhase {
        &self.checkout
    }

    /// Whether the "order placed" confirmation is showing.
    #[must_use]
    pub const fn is_order_placed(&self) -> bool {
        matches!(self.checkout, CheckoutPhase::Confirmed(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::OrderStatus;

    fn catalog() -> Vec<Product> {
        let rows: [(i32, &str, i64, &str); 8] = [
            (1, "Wireless Bluetooth Headphones", 4999, "Electronics"),
            (2, "Smart Watch Fitness Tracker", 12499, "Electronics"),
            (3, "Laptop Backpack USB Charging", 3299, "Bags"),
            (4, "Portable Power Bank 20000mAh", 2499, "Electronics"),
            (5, "Wireless Gaming Mouse RGB", 3799, "Electronics"),
            (6, "Mechanical Keyboard", 7499, "Electronics"),
            (7, "USB-C Hub 7-in-1 Adapter", 2899, "Accessories"),
            (8, "Noise Cancelling Earbuds", 6699, "Electronics"),
        ];
        rows.into_iter()
            .map(|(id, name, price, category)| Product {
                id: ProductId::new(id),
                name: name.to_string(),
                price: Decimal::from(price),
                rating: 4.5,
                reviews: 100,
                category: category.to_string(),
                image: "📦".to_string(),
                stock: 10,
            })
            .collect()
    }

    fn loaded() -> ShopState {
        ShopState::new().begin_loading().catalog_loaded(catalog())
    }

    #[test]
    fn test_catalog_lifecycle() {
        let state = ShopState::new();
        assert_eq!(state.catalog_status(), CatalogStatus::Idle);
        let state = state.begin_loading();
        assert!(state.catalog_status().is_loading());
        let state = state.catalog_loaded(catalog());
        assert_eq!(state.catalog_status(), CatalogStatus::Ready);
        assert_eq!(state.products().len(), 8);

        let failed = state.begin_loading().catalog_failed();
        assert_eq!(failed.catalog_status(), CatalogStatus::Failed);
        assert_eq!(failed.products().len(), 8);
    }

    #[test]
    fn test_default_filter_shows_full_catalog() {
        let state = loaded();
        assert_eq!(state.filtered_products(), catalog());
    }

    #[test]
    fn test_filters_narrow_the_catalog() {
        let state = loaded()
            .with_search_term("WIRELESS")
            .with_category(Category::parse("Electronics"));
        let ids: Vec<i32> = state
            .filtered_products()
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 5]);

        let state = state.with_search_term("").with_category(Category::All);
        assert_eq!(state.filtered_products().len(), 8);

        let labels: Vec<String> = state.categories().iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["All", "Electronics", "Bags", "Accessories"]);
    }

    #[test]
    fn test_add_twice_then_remove() {
        let state = loaded();
        let first = state.product(ProductId::new(1)).cloned().unwrap();

        let state = state.add_to_cart(&first).add_to_cart(&first);
        assert_eq!(state.cart().lines().len(), 1);
        assert_eq!(state.cart().line(first.id).unwrap().quantity(), 2);
        assert_eq!(state.cart_total(), first.price * Decimal::from(2));
        assert_eq!(state.cart_count(), 2);

        let state = state.remove_from_cart(first.id);
        assert!(state.cart().is_empty());
        assert_eq!(state.cart_total(), Decimal::ZERO);
    }

    #[test]
    fn test_quantity_never_drops_below_one() {
        let state = loaded();
        let item = state.product(ProductId::new(6)).cloned().unwrap();
        let state = state
            .add_to_cart(&item)
            .adjust_quantity(item.id, -3)
            .adjust_quantity(item.id, -1);
        assert_eq!(state.cart().line(item.id).unwrap().quantity(), 1);
    }

    #[test]
    fn test_wishlist_toggle_is_its_own_inverse() {
        let state = loaded();
        let item = state.product(ProductId::new(3)).cloned().unwrap();
        let before = state.clone();
        let state = state.toggle_wishlist(&item);
        assert!(state.wishlist().contains(item.id));
        assert_eq!(state.toggle_wishlist(&item), before);
    }

    #[test]
    fn test_checkout_flow() {
        let state = loaded();
        let item = state.product(ProductId::new(2)).cloned().unwrap();
        let state = state.add_to_cart(&item).toggle_cart_panel();

        let (submitting, order) = state.begin_checkout(Utc::now()).unwrap();
        assert_eq!(submitting.checkout(), &CheckoutPhase::Submitting);
        assert_eq!(order.total, item.price);
        assert_eq!(order.items.len(), 1);
        assert_eq!(
            submitting.begin_checkout(Utc::now()).unwrap_err(),
            CheckoutRejected::InFlight
        );

        let confirmed = submitting.order_placed(&order, OrderReceipt::success("abc123xyz"));
        assert!(confirmed.is_order_placed());
        assert!(confirmed.cart().is_empty());
        assert!(confirmed.cart_open());
        assert_eq!(
            confirmed.begin_checkout(Utc::now()).unwrap_err(),
            CheckoutRejected::ConfirmationPending
        );

        let stale = confirmed.clone().dismiss_confirmation("other");
        assert!(stale.is_order_placed());

        let done = confirmed.dismiss_confirmation("abc123xyz");
        assert!(!done.is_order_placed());
        assert!(!done.cart_open());
        assert_eq!(done.checkout(), &CheckoutPhase::Idle);
    }

    #[test]
    fn test_items_added_while_submitting_survive_the_order() {
        let state = loaded();
        let headphones = state.product(ProductId::new(1)).cloned().unwrap();
        let watch = state.product(ProductId::new(2)).cloned().unwrap();
        let state = state.add_to_cart(&headphones);

        let (submitting, order) = state.begin_checkout(Utc::now()).unwrap();
        let submitting = submitting.add_to_cart(&watch).add_to_cart(&headphones);

        let confirmed = submitting.order_placed(&order, OrderReceipt::success("o-1"));
        let lines: Vec<(i32, u32)> = confirmed
            .cart()
            .lines()
            .iter()
            .map(|line| (line.id().as_i32(), line.quantity()))
            .collect();
        assert_eq!(lines, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn test_checkout_rejects_empty_cart() {
        assert_eq!(
            loaded().begin_checkout(Utc::now()).unwrap_err(),
            CheckoutRejected::EmptyCart
        );
    }

    #[test]
    fn test_abandoned_checkout_keeps_cart() {
        let state = loaded();
        let item = state.product(ProductId::new(4)).cloned().unwrap();
        let state = state.add_to_cart(&item);
        let (submitting, _) = state.begin_checkout(Utc::now()).unwrap();
        let back = submitting.checkout_abandoned();
        assert_eq!(back, state);

        let receipt = OrderReceipt {
            order_id: "x".to_string(),
            status: OrderStatus::Failed,
        };
        assert!(!receipt.is_success());
    }
}
