//! ShopZone Core - Catalog, cart and order types.
//!
//! This crate provides the types shared by every ShopZone component:
//! - `storefront` - Server-rendered storefront (catalog, cart, wishlist, checkout)
//! - `integration-tests` - End-to-end tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and pure transitions - no I/O, no HTTP
//! clients, no async runtime. Session state is one immutable [`ShopState`]
//! record; every user action is a function from the old record to a new one,
//! so the whole storefront can be tested without a browser or a server.
//!
//! # Modules
//!
//! - [`types`] - Products, prices, cart, wishlist, filters, orders and statuses
//! - [`shop`] - The per-session [`ShopState`] record and its transitions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod shop;
pub mod types;

pub use shop::{CheckoutPhase, CheckoutRejected, ShopState};
pub use types::*;
