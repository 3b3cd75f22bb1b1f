use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CatalogItem, ContentType},
    routes::AppState,
    services::title_search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    content_type: ContentType,
    q: String,
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<CatalogItem>> {
    let provider = state.catalog(params.content_type).provider.clone();
    let item = title_search::lookup_title(provider, &params.q).await?;
    Ok(Json(item))
}
