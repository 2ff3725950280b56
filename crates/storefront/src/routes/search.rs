//! Search route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use tracing::instrument;

use shopcart_store::SearchQuery;

use crate::routes::products::ProductView;
use crate::state::AppState;

/// Search results data.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// False when the term is too short and no category is chosen.
    pub active: bool,
    pub results: Vec<ProductView>,
}

/// Search the catalog by term and category.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let results = state
        .catalog()
        .search(&query)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Json(SearchResponse {
        active: query.is_active(),
        query: query.term,
        category: query.category,
        results,
    })
}
