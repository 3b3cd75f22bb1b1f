use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        content_type = %request.content_type,
        title_count = request.titles.len(),
        genre_count = request.genres.len(),
        "Processing recommendation request"
    );

    let catalog = state.catalog(request.content_type);
    let response = recommendations::get_recommendations(
        catalog.provider.clone(),
        &catalog.genres,
        request,
        state.defaults,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = response.recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(response))
}
