//! Catalog route handlers: product grid, search and category filters.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use shopzone_core::{CatalogStatus, Category, CurrencyCode, Product, ShopState};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub price: String,
    pub stars: String,
    pub reviews: u32,
    pub stock: u32,
    pub wished: bool,
}

impl ProductView {
    fn new(product: &Product, state: &ShopState, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.unit_price(currency).display(),
            stars: product.rating_stars(),
            reviews: product.reviews,
            stock: product.stock,
            wished: state.wishlist().contains(product.id),
        }
    }
}

/// Category chip display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub label: String,
    pub selected: bool,
}

/// Catalog display data: category chips plus the filtered grid.
#[derive(Clone)]
pub struct CatalogView {
    pub categories: Vec<CategoryView>,
    pub products: Vec<ProductView>,
    pub failed: bool,
}

impl CatalogView {
    #[must_use]
    pub fn from_state(state: &ShopState, currency: CurrencyCode) -> Self {
        let selected = &state.filter().category;
        Self {
            categories: state
                .categories()
                .into_iter()
                .map(|category| CategoryView {
                    selected: category == *selected,
                    label: category.label().to_string(),
                })
                .collect(),
            products: state
                .filtered_products()
                .iter()
                .map(|product| ProductView::new(product, state, currency))
                .collect(),
            failed: state.catalog_status() == CatalogStatus::Failed,
        }
    }
}

/// Catalog fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog.html")]
pub struct CatalogTemplate {
    pub catalog: CatalogView,
}

/// Search form data.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

/// Category form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub category: String,
}

fn render(state: &AppState, shop: &ShopState) -> CatalogTemplate {
    CatalogTemplate {
        catalog: CatalogView::from_state(shop, state.config().currency),
    }
}

/// Render the catalog with the session's current filters.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    Ok(render(&state, &shop.snapshot()))
}

/// Update the search term and re-render the catalog.
#[instrument(skip(state, session))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SearchForm>,
) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    shop.set_search_term(form.q);
    Ok(render(&state, &shop.snapshot()))
}

/// Select a category and re-render the catalog.
#[instrument(skip(state, session))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<impl IntoResponse> {
    let shop = state.shop(&session).await?;
    shop.set_category(Category::parse(&form.category));
    Ok(render(&state, &shop.snapshot()))
}
