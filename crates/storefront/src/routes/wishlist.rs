//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::cart::ProductForm;
use crate::state::AppState;

/// Wishlist count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_count.html")]
pub struct WishlistCountTemplate {
    pub wishlist_count: usize,
}

/// Add or remove a product from the wishlist (HTMX).
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    let product = shop
        .product(form.product_id)
        .ok_or(AppError::UnknownProduct(form.product_id))?;
    shop.toggle_wishlist(&product);

    Ok((
        AppendHeaders([("HX-Trigger", "wishlist-updated")]),
        WishlistCountTemplate {
            wishlist_count: shop.wishlist_count(),
        },
    ))
}

/// Get wishlist count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    Ok(WishlistCountTemplate {
        wishlist_count: shop.wishlist_count(),
    })
}
