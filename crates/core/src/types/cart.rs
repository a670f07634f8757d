//! Shopping cart.
//!
//! A [`Cart`] keeps one [`CartLine`] per product, in the order products were
//! first added. Quantities never drop below one: decrementing clamps, and the
//! only way to get rid of a line is [`Cart::remove`].

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::ProductId;
use super::product::Product;

/// One product's aggregated quantity in the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    #[serde(flatten)]
    product: Product,
    quantity: u32,
}

impl CartLine {
    /// A new line holding a single unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }

    fn adjust(&mut self, delta: i64) {
        let next = i64::from(self.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        self.quantity = u32::try_from(next).unwrap_or(u32::MAX);
    }
}

/// Insertion-ordered cart lines, unique per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`, merging into an existing line if present.
    ///
    /// Stock is not enforced.
    pub fn add(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|line| line.id() == product.id) {
            Some(line) => line.adjust(1),
            None => self.lines.push(CartLine::new(product.clone())),
        }
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        self.lines.len() != before
    }

    /// Change the quantity of the line for `id` by `delta`, never below one.
    ///
    /// Returns the new quantity, or `None` if the product is not in the cart.
    pub fn adjust_quantity(&mut self, id: ProductId, delta: i64) -> Option<u32> {
        let line = self.lines.iter_mut().find(|line| line.id() == id)?;
        line.adjust(delta);
        Some(line.quantity)
    }

    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Take the quantities of `ordered` out of the cart.
    ///
    /// Units added after the order was taken stay in the cart; lines that end
    /// up with nothing left are dropped.
    pub fn discard_ordered(&mut self, ordered: &[CartLine]) {
        for sold in ordered {
            if let Some(line) = self.lines.iter_mut().find(|line| line.id() == sold.id()) {
                line.quantity = line.quantity.saturating_sub(sold.quantity);
            }
        }
        self.lines.retain(|line| line.quantity > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            rating: 4.0,
            reviews: 10,
            category: "Electronics".to_string(),
            image: "📦".to_string(),
            stock: 3,
        }
    }

    #[test]
    fn test_repeated_add_merges_into_one_line() {
        let mut cart = Cart::new();
        let item = product(1, 4999);
        for _ in 0..5 {
            cart.add(&item);
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(item.id).map(CartLine::quantity), Some(5));
    }

    #[test]
    fn test_add_ignores_stock() {
        let mut cart = Cart::new();
        let item = product(1, 10);
        for _ in 0..(item.stock + 2) {
            cart.add(&item);
        }
        assert_eq!(cart.count(), u64::from(item.stock + 2));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&product(3, 1));
        cart.add(&product(1, 1));
        cart.add(&product(3, 1));
        let ids: Vec<i32> = cart.lines().iter().map(|l| l.id().as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_adjust_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        let item = product(1, 100);
        cart.add(&item);
        cart.add(&item);

        assert_eq!(cart.adjust_quantity(item.id, -1), Some(1));
        assert_eq!(cart.adjust_quantity(item.id, -1), Some(1));
        assert_eq!(cart.adjust_quantity(item.id, i64::MIN), Some(1));
        assert_eq!(cart.adjust_quantity(item.id, 4), Some(5));
        assert_eq!(cart.adjust_quantity(item.id, i64::MAX), Some(u32::MAX));
        assert_eq!(cart.adjust_quantity(ProductId::new(99), 1), None);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100));
        assert!(!cart.remove(ProductId::new(2)));
        assert!(cart.remove(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_and_count_track_every_operation() {
        let mut cart = Cart::new();
        let a = product(1, 4999);
        let b = product(2, 2899);

        cart.add(&a);
        cart.add(&b);
        cart.add(&a);
        cart.adjust_quantity(b.id, 2);
        cart.adjust_quantity(a.id, -5);
        cart.add(&a);

        let expected_total: Decimal = cart.lines().iter().map(|l| l.line_total()).sum();
        let expected_count: u64 = cart.lines().iter().map(|l| u64::from(l.quantity())).sum();
        assert_eq!(cart.total(), expected_total);
        assert_eq!(cart.count(), expected_count);
        assert_eq!(cart.total(), Decimal::from(2 * 4999 + 3 * 2899));
        assert_eq!(cart.count(), 5);

        cart.remove(a.id);
        cart.remove(b.id);
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_discard_ordered_keeps_later_additions() {
        let mut cart = Cart::new();
        let a = product(1, 4999);
        let b = product(2, 2899);
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);
        let ordered = cart.lines().to_vec();

        cart.add(&a);
        cart.add(&product(3, 100));
        cart.adjust_quantity(b.id, -1);
        cart.discard_ordered(&ordered);

        let left: Vec<(i32, u32)> = cart
            .lines()
            .iter()
            .map(|l| (l.id().as_i32(), l.quantity()))
            .collect();
        assert_eq!(left, vec![(1, 1), (3, 1)]);
    }

    #[test]
    fn test_line_serializes_flat() {
        let line = CartLine::new(product(4, 2499));
        let value = serde_json::to_value(&line).unwrap_or_default();
        assert_eq!(value["id"], 4);
        assert_eq!(value["quantity"], 1);
    }
}
