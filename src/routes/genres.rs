use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    models::{ContentType, GenreEntry},
    routes::AppState,
};

/// Numbered genre list users pick their genres from
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(content_type): Path<ContentType>,
) -> Json<Vec<GenreEntry>> {
    Json(state.catalog(content_type).genres.entries())
}
