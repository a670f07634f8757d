//! Catalog-cart controller.
//!
//! One [`ShopController`] serves one shopper session. It holds the session's
//! [`ShopState`] and applies the core transitions to it; only catalog loading
//! and checkout wait on the [`ProductSource`]. The state mutex is never held
//! across an `.await`, so every operation sees a consistent snapshot.
//!
//! Both suspending operations are single-flight: a second `load_catalog` or
//! `checkout` while one is pending is rejected rather than queued. A checkout
//! cannot be cancelled once the order has been handed to the source.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use shopzone_core::{
    Category, CheckoutRejected, Order, OrderReceipt, OrderStatus, Product, ProductId, ShopState,
};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::source::{FetchError, OrderError, ProductSource};

/// How long the "order placed" confirmation stays up.
pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_millis(2000);

/// Errors from [`ShopController::load_catalog`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Catalog is already loading")]
    InFlight,

    #[error("Catalog fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Errors from [`ShopController::checkout`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout could not start (empty cart, already submitting, confirming).
    #[error("Checkout rejected: {0}")]
    Rejected(#[from] CheckoutRejected),

    /// The product source could not be reached or answered garbage.
    #[error("Order submission failed: {0}")]
    Submit(#[from] OrderError),

    /// The product source answered, but not with `success`.
    #[error("Order {order_id} was not accepted (status: {status})")]
    NotAccepted {
        order_id: String,
        status: OrderStatus,
    },

    /// The submission task panicked before reporting an outcome.
    #[error("Order submission task failed: {0}")]
    Task(#[from] JoinError),
}

/// Owns one session's storefront state.
pub struct ShopController {
    source: Arc<dyn ProductSource>,
    state: Arc<Mutex<ShopState>>,
    confirmation_delay: Duration,
}

impl std::fmt::Debug for ShopController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopController")
            .field("state", &*lock(&self.state))
            .field("confirmation_delay", &self.confirmation_delay)
            .finish_non_exhaustive()
    }
}

impl ShopController {
    #[must_use]
    pub fn new(source: Arc<dyn ProductSource>, confirmation_delay: Duration) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(ShopState::new())),
            confirmation_delay,
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the catalog from the product source and make it current.
    ///
    /// Returns the number of products loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InFlight`] if a load is already pending, or
    /// [`LoadError::Fetch`] if the source failed (the catalog is then marked
    /// failed and keeps its previous products).
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) -> Result<usize, LoadError> {
        self.update(|state| {
            if state.catalog_status().is_loading() {
                (state, Err(LoadError::InFlight))
            } else {
                (state.begin_loading(), Ok(()))
            }
        })?;
        let rollback = Rollback::new(&self.state, ShopState::catalog_failed);

        let result = self.source.fetch_products().await;
        rollback.disarm();

        match result {
            Ok(products) => {
                let count = products.len();
                self.transition(|state| state.catalog_loaded(products));
                info!(count, "Catalog loaded");
                Ok(count)
            }
            Err(e) => {
                self.transition(ShopState::catalog_failed);
                warn!(error = %e, "Catalog load failed");
                Err(e.into())
            }
        }
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.read(|state| state.product(id).cloned())
    }

    /// Products matching the current search term and category.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<Product> {
        self.read(ShopState::filtered_products)
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.read(ShopState::categories)
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.transition(|state| state.with_search_term(term));
    }

    pub fn set_category(&self, category: Category) {
        self.transition(|state| state.with_category(category));
    }

    // =========================================================================
    // Cart and wishlist
    // =========================================================================

    pub fn add_to_cart(&self, product: &Product) {
        self.transition(|state| state.add_to_cart(product));
        debug!(product_id = %product.id, "Added to cart");
    }

    pub fn remove_from_cart(&self, id: ProductId) {
        self.transition(|state| state.remove_from_cart(id));
    }

    /// Adjust a line's quantity by `delta`; it never drops below one.
    pub fn set_quantity(&self, id: ProductId, delta: i64) {
        self.transition(|state| state.adjust_quantity(id, delta));
    }

    /// Toggle `product` on the wishlist. Returns whether it is now wished for.
    pub fn toggle_wishlist(&self, product: &Product) -> bool {
        self.update(|state| {
            let next = state.toggle_wishlist(product);
            let wished = next.wishlist().contains(product.id);
            (next, wished)
        })
    }

    /// Open or close the cart panel. Returns whether it is now open.
    pub fn toggle_cart_panel(&self) -> bool {
        self.update(|state| {
            let next = state.toggle_cart_panel();
            let open = next.cart_open();
            (next, open)
        })
    }

    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.read(ShopState::cart_total)
    }

    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.read(ShopState::cart_count)
    }

    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.read(|state| state.wishlist().len())
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ShopState {
        self.read(Clone::clone)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Submit the cart as an order.
    ///
    /// On success the ordered items leave the cart and the confirmation shows
    /// for the configured delay, after which it is dismissed and the cart panel
    /// closes. On any other outcome the cart is left as it was.
    ///
    /// The submission runs on its own task: once started it completes even if
    /// the caller stops waiting, so an order is never sent twice.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Rejected`] if checkout cannot start,
    /// [`CheckoutError::Submit`] if the source failed,
    /// [`CheckoutError::NotAccepted`] for a non-success status, and
    /// [`CheckoutError::Task`] if the submission task panicked.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<OrderReceipt, CheckoutError> {
        let order = self.update(|state| match state.begin_checkout(Utc::now()) {
            Ok((next, order)) => (next, Ok(order)),
            Err(rejected) => (state, Err(rejected)),
        })?;

        let submission = tokio::spawn(
            submit_order(
                Arc::clone(&self.source),
                Arc::clone(&self.state),
                order,
                self.confirmation_delay,
            )
            .in_current_span(),
        );

        match submission.await {
            Ok(result) => result,
            Err(e) => {
                self.transition(ShopState::checkout_abandoned);
                error!(error = %e, "Order submission task failed, cart kept");
                Err(CheckoutError::Task(e))
            }
        }
    }

    // =========================================================================
    // State access
    // =========================================================================

    fn read<R>(&self, f: impl FnOnce(&ShopState) -> R) -> R {
        let guard = lock(&self.state);
        f(&guard)
    }

    fn transition(&self, f: impl FnOnce(ShopState) -> ShopState) {
        transition(&self.state, f);
    }

    fn update<R>(&self, f: impl FnOnce(ShopState) -> (ShopState, R)) -> R {
        update(&self.state, f)
    }
}

/// Send `order` and apply the outcome to `state`.
async fn submit_order(
    source: Arc<dyn ProductSource>,
    state: Arc<Mutex<ShopState>>,
    order: Order,
    confirmation_delay: Duration,
) -> Result<OrderReceipt, CheckoutError> {
    match source.create_order(&order).await {
        Ok(receipt) if receipt.is_success() => {
            let placed = receipt.clone();
            transition(&state, |current| current.order_placed(&order, placed));
            schedule_dismissal(state, receipt.order_id.clone(), confirmation_delay);
            info!(order_id = %receipt.order_id, total = %order.total, "Order placed");
            Ok(receipt)
        }
        Ok(receipt) => {
            transition(&state, ShopState::checkout_abandoned);
            warn!(
                order_id = %receipt.order_id,
                status = %receipt.status,
                "Order not accepted, cart kept"
            );
            Err(CheckoutError::NotAccepted {
                order_id: receipt.order_id,
                status: receipt.status,
            })
        }
        Err(e) => {
            transition(&state, ShopState::checkout_abandoned);
            warn!(error = %e, "Order submission failed, cart kept");
            Err(e.into())
        }
    }
}

fn schedule_dismissal(state: Arc<Mutex<ShopState>>, order_id: String, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        transition(&state, |current| current.dismiss_confirmation(&order_id));
        debug!(order_id = %order_id, "Order confirmation dismissed");
    });
}

fn lock(state: &Mutex<ShopState>) -> MutexGuard<'_, ShopState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn update<R>(state: &Mutex<ShopState>, f: impl FnOnce(ShopState) -> (ShopState, R)) -> R {
    let mut guard = lock(state);
    let (next, out) = f(std::mem::take(&mut *guard));
    *guard = next;
    out
}

fn transition(state: &Mutex<ShopState>, f: impl FnOnce(ShopState) -> ShopState) {
    update(state, |current| (f(current), ()));
}

/// Undoes a pending catalog load if the awaiting future is dropped before it
/// resolves.
struct Rollback<'a> {
    state: &'a Mutex<ShopState>,
    undo: Option<fn(ShopState) -> ShopState>,
}

impl<'a> Rollback<'a> {
    const fn new(state: &'a Mutex<ShopState>, undo: fn(ShopState) -> ShopState) -> Self {
        Self {
            state,
            undo: Some(undo),
        }
    }

    fn disarm(mut self) {
        self.undo = None;
    }
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            transition(self.state, undo);
            debug!("Pending operation cancelled, state rolled back");
        }
    }
}
