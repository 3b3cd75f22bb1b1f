use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::{ContentType, GenreVocabulary},
    services::{providers::CatalogProvider, recommendations::RecommendationDefaults},
};

pub mod genres;
pub mod recommendations;
pub mod titles;

/// Provider and genre vocabulary serving one content type
#[derive(Clone)]
pub struct Catalog {
    pub provider: Arc<dyn CatalogProvider>,
    pub genres: Arc<GenreVocabulary>,
}

impl Catalog {
    /// Pairs a provider with the vocabulary of the content type it serves
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        let genres = Arc::new(provider.content_type().genre_vocabulary());
        Self { provider, genres }
    }
}

/// Shared application state
pub struct AppState {
    pub movie: Catalog,
    pub anime: Catalog,
    pub manga: Catalog,
    pub defaults: RecommendationDefaults,
}

impl AppState {
    pub fn catalog(&self, content_type: ContentType) -> &Catalog {
        match content_type {
            ContentType::Movie => &self.movie,
            ContentType::Anime => &self.anime,
            ContentType::Manga => &self.manga,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/genres/:content_type", get(genres::list))
        .route("/titles/search", get(titles::search))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
