//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::routes::cart::CartView;
use crate::routes::products::CatalogView;
use crate::state::AppState;

/// Home page template.
///
/// Renders every fragment inline so the first paint needs no HTMX round trip.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub search_term: String,
    pub catalog: CatalogView,
    pub cart: CartView,
    pub cart_count: u64,
    pub wishlist_count: usize,
}

/// Display the storefront.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?.snapshot();

    Ok(IndexTemplate {
        search_term: shop.filter().search_term.clone(),
        catalog: CatalogView::from_state(&shop, state.config().currency),
        cart: CartView::from_state(&shop, &state),
        cart_count: shop.cart_count(),
        wishlist_count: shop.wishlist().len(),
    })
}
