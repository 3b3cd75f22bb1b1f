use crate::{
    error::{AppError, AppResult},
    models::CatalogItem,
    services::providers::CatalogProvider,
};
use std::sync::Arc;

/// Looks up a single title and normalizes the match
///
/// A missing match and a record without id or title are both reported as
/// `NotFound`.
pub async fn lookup_title(
    provider: Arc<dyn CatalogProvider>,
    query: &str,
) -> AppResult<CatalogItem> {
    let record = provider.lookup_by_title(query).await?;

    record
        .and_then(|r| r.normalize())
        .ok_or_else(|| AppError::NotFound(format!("No data found for {}", query.trim())))
}
