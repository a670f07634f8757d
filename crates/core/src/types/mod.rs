//! Core types for ShopZone.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod filter;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;
pub mod wishlist;

pub use cart::{Cart, CartLine};
pub use filter::{Category, Filter};
pub use id::*;
pub use order::{Order, OrderReceipt};
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use status::*;
pub use wishlist::Wishlist;
