/// Catalog data provider abstraction
///
/// Each content domain is served by one provider: TMDB for movies, Jikan for
/// anime and manga. Providers return raw catalog records; turning those into
/// `CatalogItem`s is left to the caller.
use crate::{
    error::{AppError, AppResult},
    models::{ContentType, RawRecord},
};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub mod jikan;
pub mod tmdb;

pub use jikan::JikanProvider;
pub use tmdb::TmdbProvider;

/// Trait for catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Best match for a title, or `None` when the catalog has nothing
    async fn lookup_by_title(&self, title: &str) -> AppResult<Option<RawRecord>>;

    /// Up to `limit` records matching the given genres, in the catalog's own
    /// ranking order
    async fn fetch_by_genres(&self, genre_ids: &[u32], limit: usize) -> AppResult<Vec<RawRecord>>;

    /// Looks up several titles, at most `lookup_concurrency` at a time
    ///
    /// Results come back in the order of `titles`, one per title, so a failed
    /// lookup never hides the others.
    async fn lookup_batch(&self, titles: Vec<String>) -> Vec<AppResult<Option<RawRecord>>> {
        let permits = Arc::new(Semaphore::new(self.lookup_concurrency().max(1)));
        let mut tasks = Vec::new();

        for title in titles {
            let provider = self.clone_for_task();
            let permits = Arc::clone(&permits);
            let task = tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                provider.lookup_by_title(&title).await
            });
            tasks.push(task);
        }

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    Err(AppError::Internal(e.to_string()))
                }
            };
            results.push(result);
        }

        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            tracing::warn!(
                provider = self.name(),
                success_count = results.len() - failures,
                error_count = failures,
                "Partial title lookup failure"
            );
        }

        results
    }

    /// Title lookups allowed in flight at once
    fn lookup_concurrency(&self) -> usize {
        4
    }

    /// Clone provider for parallel task execution
    fn clone_for_task(&self) -> Box<dyn CatalogProvider>;

    /// Content type served by this provider
    fn content_type(&self) -> ContentType;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Rejects blank lookups before any request is made
pub(crate) fn ensure_query(title: &str) -> AppResult<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Comma separated genre list as expected by both catalogs
pub(crate) fn genre_param(genre_ids: &[u32]) -> String {
    genre_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Turns a non-2xx response into an `ExternalApi` error
pub(crate) async fn check_status(
    response: reqwest::Response,
    provider: &str,
) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::ExternalApi(format!(
        "{} API returned status {}: {}",
        provider, status, body
    )))
}
