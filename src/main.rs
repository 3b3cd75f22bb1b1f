use std::sync::Arc;

use streamsaga::{
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState, Catalog},
    services::{
        providers::{JikanProvider, TmdbProvider},
        recommendations::RecommendationDefaults,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("streamsaga=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client);

    let state = Arc::new(AppState {
        movie: Catalog::new(Arc::new(TmdbProvider::new(
            cache.clone(),
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        ))),
        anime: Catalog::new(Arc::new(JikanProvider::anime(
            cache.clone(),
            config.jikan_api_url.clone(),
        ))),
        manga: Catalog::new(Arc::new(JikanProvider::manga(
            cache,
            config.jikan_api_url.clone(),
        ))),
        defaults: RecommendationDefaults {
            count: config.recommendation_count,
            pool_size: config.candidate_pool_size,
        },
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
