//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use shopcart_core::{Product, ProductId};
use shopcart_store::{DEFAULT_RELATED_LIMIT, format_money};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// Price formatted for display; `$0.00` if the catalog price is not numeric.
    pub display_price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            product: product.clone(),
            display_price: format_money(product.price.amount_or_zero()),
        }
    }
}

/// Product listing data.
#[derive(Debug, Serialize)]
pub struct ProductListing {
    pub products: Vec<ProductView>,
    pub categories: Vec<String>,
}

/// Product detail data.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: ProductView,
    pub related: Vec<ProductView>,
}

/// List the whole catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<ProductListing> {
    let catalog = state.catalog();
    Json(ProductListing {
        products: catalog.products().iter().map(ProductView::from).collect(),
        categories: catalog.categories().into_iter().map(String::from).collect(),
    })
}

/// Show one product with a few related ones.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>> {
    let id = ProductId::new(id);
    let catalog = state.catalog();
    let product = catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(ProductDetail {
        product: ProductView::from(product),
        related: catalog
            .related(&id, DEFAULT_RELATED_LIMIT)
            .into_iter()
            .map(ProductView::from)
            .collect(),
    }))
}
