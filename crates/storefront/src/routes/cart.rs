//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with a fragment and an `HX-Trigger` so the count
//! badge and the panel refresh themselves.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use serde::Deserialize;
use shopzone_core::{CartLine, CheckoutPhase, CurrencyCode, Price, ProductId, ShopState};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl CartItemView {
    fn new(line: &CartLine, currency: CurrencyCode) -> Self {
        let product = line.product();
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            image: product.image.clone(),
            quantity: line.quantity(),
            price: product.unit_price(currency).display(),
            line_price: (product.unit_price(currency) * line.quantity()).display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub count: u64,
    pub open: bool,
    pub submitting: bool,
    pub order_placed: bool,
    pub order_id: String,
    /// Milliseconds until the confirmation should be re-fetched.
    pub confirmation_ms: u128,
}

impl CartView {
    #[must_use]
    pub fn from_state(state: &ShopState, app: &AppState) -> Self {
        let currency = app.config().currency;
        let order_id = match state.checkout() {
            CheckoutPhase::Confirmed(receipt) => receipt.order_id.clone(),
            CheckoutPhase::Idle | CheckoutPhase::Submitting => String::new(),
        };

        Self {
            items: state
                .cart()
                .lines()
                .iter()
                .map(|line| CartItemView::new(line, currency))
                .collect(),
            total: Price::new(state.cart_total(), currency).display_exact(),
            count: state.cart_count(),
            open: state.cart_open(),
            submitting: matches!(state.checkout(), CheckoutPhase::Submitting),
            order_placed: state.is_order_placed(),
            order_id,
            confirmation_ms: app.config().confirmation_delay.as_millis(),
        }
    }
}

/// Form data naming a single product.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: ProductId,
}

/// Update cart form data. `delta` is added to the current quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub delta: i64,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u64,
}

fn panel(state: &AppState, shop: &ShopState) -> CartPanelTemplate {
    CartPanelTemplate {
        cart: CartView::from_state(shop, state),
    }
}

/// Display the cart panel.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    Ok(panel(&state, &shop.snapshot()))
}

/// Open or close the cart panel (HTMX).
#[instrument(skip(state, session))]
pub async fn toggle(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    shop.toggle_cart_panel();
    Ok(panel(&state, &shop.snapshot()))
}

/// Add one unit of a product to the cart (HTMX).
///
/// Returns the cart count badge with an HTMX trigger to update other elements.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    let product = shop
        .product(form.product_id)
        .ok_or(AppError::UnknownProduct(form.product_id))?;
    shop.add_to_cart(&product);

    let product_id = form.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            cart_count: shop.cart_count(),
        },
    ))
}

/// Change a line's quantity by a delta (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    shop.set_quantity(form.product_id, form.delta);

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        panel(&state, &shop.snapshot()),
    ))
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    shop.remove_from_cart(form.product_id);

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        panel(&state, &shop.snapshot()),
    ))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    Ok(CartCountTemplate {
        cart_count: shop.cart_count(),
    })
}

/// Place the order for the current cart.
///
/// Answers with the panel showing the confirmation. The panel polls itself
/// once the confirmation window has passed.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    let receipt = shop.checkout().await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", receipt.order_id.as_str())]),
    );

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        panel(&state, &shop.snapshot()),
    ))
}
