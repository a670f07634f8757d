//! Catalog search and category filtering.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Label of the catch-all category.
pub const ALL_CATEGORIES: &str = "All";

/// Category selection: every category, or one exact category name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    All,
    Named(String),
}

impl Category {
    /// Parse a category label, mapping `"All"` to [`Category::All`].
    ///
    /// Unknown names are kept as-is; they simply match nothing.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        if label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(label.to_string())
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => product.category == *name,
        }
    }

    /// `All` followed by each distinct category of `products`, in first-seen order.
    #[must_use]
    pub fn from_catalog(products: &[Product]) -> Vec<Self> {
        let mut categories = vec![Self::All];
        for product in products {
            let category = Self::Named(product.category.clone());
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

/// Current search term and category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Case-insensitive substring matched against product names.
    pub search_term: String,
    pub category: Category,
}

impl Filter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        product.name_contains(&self.search_term) && self.category.matches(product)
    }

    /// Products passing the filter, in catalog order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::id::ProductId;

    fn product(id: i32, name: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::from(1000),
            rating: 4.2,
            reviews: 12,
            category: category.to_string(),
            image: "📦".to_string(),
            stock: 4,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Wireless Bluetooth Headphones", "Electronics"),
            product(2, "Laptop Backpack USB Charging", "Bags"),
            product(3, "Wireless Gaming Mouse RGB", "Electronics"),
            product(4, "USB-C Hub 7-in-1 Adapter", "Accessories"),
        ]
    }

    #[test]
    fn test_default_filter_returns_everything_in_order() {
        let products = catalog();
        assert_eq!(Filter::default().apply(&products), products);
    }

    #[test]
    fn test_search_and_category_combine() {
        let filter = Filter {
            search_term: "wireless".to_string(),
            category: Category::parse("Electronics"),
        };
        let ids: Vec<i32> = filter
            .apply(&catalog())
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 3]);

        let filter = Filter {
            search_term: "usb".to_string(),
            category: Category::All,
        };
        assert_eq!(filter.apply(&catalog()).len(), 2);
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let filter = Filter {
            search_term: String::new(),
            category: Category::parse("Garden"),
        };
        assert!(filter.apply(&catalog()).is_empty());
    }

    #[test]
    fn test_categories_from_catalog() {
        let labels: Vec<String> = Category::from_catalog(&catalog())
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(labels, vec!["All", "Electronics", "Bags", "Accessories"]);
        assert_eq!(Category::from_catalog(&[]), vec![Category::All]);
    }
}
