use crate::{
    error::{AppError, AppResult, EngineError},
    models::{
        CatalogItem, GenreVocabulary, RecommendationRequest, RecommendationResponse,
        SeedOutcome, SeedStatus,
    },
    services::{
        collection::CatalogCollection, features::FeatureBuilder, providers::CatalogProvider,
        recommender::recommend, similarity::compute_similarity,
    },
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

const MAX_RECOMMENDATIONS: usize = 50;
const MAX_POOL_SIZE: usize = 100;

/// Fallback values for optional request fields
#[derive(Debug, Clone, Copy)]
pub struct RecommendationDefaults {
    pub count: usize,
    pub pool_size: usize,
}

impl Default for RecommendationDefaults {
    fn default() -> Self {
        Self {
            count: 5,
            pool_size: 20,
        }
    }
}

/// A request that passed validation, with defaults filled in
#[derive(Debug, Clone)]
struct ValidatedRequest {
    titles: Vec<String>,
    genres: Vec<u32>,
    count: usize,
    pool_size: usize,
}

fn validate(
    request: RecommendationRequest,
    genres: &GenreVocabulary,
    defaults: RecommendationDefaults,
) -> AppResult<ValidatedRequest> {
    if request.titles.is_empty() {
        return Err(AppError::InvalidInput(
            "Provide at least one title".to_string(),
        ));
    }
    if request.titles.iter().any(|t| t.trim().is_empty()) {
        return Err(AppError::InvalidInput("Titles cannot be blank".to_string()));
    }
    if request.genres.is_empty() {
        return Err(AppError::InvalidInput(
            "Select at least one genre".to_string(),
        ));
    }
    if let Some(unknown) = request.genres.iter().find(|id| !genres.contains(**id)) {
        return Err(AppError::InvalidInput(format!(
            "Unknown {} genre id {}",
            request.content_type, unknown
        )));
    }

    let count = request.count.unwrap_or(defaults.count);
    if !(1..=MAX_RECOMMENDATIONS).contains(&count) {
        return Err(AppError::InvalidInput(format!(
            "count must be between 1 and {}",
            MAX_RECOMMENDATIONS
        )));
    }

    let pool_size = request.pool_size.unwrap_or(defaults.pool_size);
    if !(1..=MAX_POOL_SIZE).contains(&pool_size) {
        return Err(AppError::InvalidInput(format!(
            "pool_size must be between 1 and {}",
            MAX_POOL_SIZE
        )));
    }

    Ok(ValidatedRequest {
        titles: request
            .titles
            .into_iter()
            .map(|t| t.trim().to_string())
            .collect(),
        genres: request.genres,
        count,
        pool_size,
    })
}

/// Runs one recommendation request end to end
///
/// 1. Look up every title the user gave; misses are reported, not fatal
/// 2. Fetch candidates for the selected genres
/// 3. Assemble seeds and candidates into one collection without duplicate ids
/// 4. Rank the collection against its first item, skipping the user's titles
pub async fn get_recommendations(
    provider: Arc<dyn CatalogProvider>,
    genres: &GenreVocabulary,
    request: RecommendationRequest,
    defaults: RecommendationDefaults,
) -> AppResult<RecommendationResponse> {
    let start = Instant::now();
    let content_type = request.content_type;
    let request = validate(request, genres, defaults)?;

    tracing::info!(
        content_type = %content_type,
        titles = request.titles.len(),
        genres = request.genres.len(),
        provider = provider.name(),
        "Starting recommendation run"
    );

    // 1. Seeds
    let lookups = provider.lookup_batch(request.titles.clone()).await;
    let mut seeds: Vec<CatalogItem> = Vec::new();
    let mut outcomes: Vec<SeedOutcome> = Vec::with_capacity(request.titles.len());

    for (query, lookup) in request.titles.iter().zip(lookups) {
        let outcome = match lookup {
            Ok(Some(record)) => match record.normalize() {
                Some(item) => {
                    let outcome = SeedOutcome {
                        query: query.clone(),
                        status: SeedStatus::Found,
                        matched_title: Some(item.title.clone()),
                        id: Some(item.id),
                    };
                    seeds.push(item);
                    outcome
                }
                None => {
                    tracing::warn!(query = %query, "Catalog record has neither id nor title");
                    seed_miss(query, SeedStatus::Invalid)
                }
            },
            Ok(None) => {
                tracing::info!(query = %query, "No data found for title");
                seed_miss(query, SeedStatus::NotFound)
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Title lookup failed");
                seed_miss(query, SeedStatus::Failed)
            }
        };
        outcomes.push(outcome);
    }

    // 2. Candidate pool
    let seed_ids: std::collections::HashSet<u64> = seeds.iter().map(|s| s.id).collect();
    let candidates: Vec<CatalogItem> = provider
        .fetch_by_genres(&request.genres, request.pool_size)
        .await?
        .into_iter()
        .filter_map(|record| record.normalize())
        .filter(|item| !seed_ids.contains(&item.id))
        .collect();

    // 3. Collection
    let collection = CatalogCollection::assemble(seeds, candidates);
    if collection.is_empty() {
        return Err(EngineError::EmptyInput.into());
    }
    if collection.seed_ids().is_empty() {
        tracing::warn!("No seed title resolved, ranking against the first candidate");
    }

    // 4. Model and ranking
    let reference_index = 0;
    let features = FeatureBuilder::new(genres).build(collection.items())?;
    let similarity = compute_similarity(&features);
    let recommendations = recommend(
        collection.items(),
        &similarity,
        reference_index,
        collection.seed_ids(),
        request.count,
    )?;

    let reference = collection.items()[reference_index].title.clone();

    tracing::info!(
        content_type = %content_type,
        reference = %reference,
        collection_size = collection.len(),
        recommendations = recommendations.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Recommendation run completed"
    );

    Ok(RecommendationResponse {
        content_type,
        reference,
        seeds: outcomes,
        recommendations,
        collection_size: collection.len(),
        generated_at: Utc::now(),
    })
}

fn seed_miss(query: &str, status: SeedStatus) -> SeedOutcome {
    SeedOutcome {
        query: query.to_string(),
        status,
        matched_title: None,
        id: None,
    }
}
