/// TMDB (The Movie Database) provider for movies
///
/// API Flow:
/// 1. Title lookup: /search/movie?query= → first result
/// 2. Candidate pool: /discover/movie?with_genres=&page= → most popular first,
///    walking pages until the pool is full
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{ContentType, RawRecord, TmdbMovie, TmdbPage},
    services::providers::{check_status, ensure_query, genre_param, CatalogProvider},
};
use reqwest::Client as HttpClient;

const LOOKUP_CACHE_TTL: u64 = 3600; // 1 hour
const POOL_CACHE_TTL: u64 = 21600; // 6 hours
const PROVIDER_NAME: &str = "tmdb";
/// Results TMDB serves per discover page
const TMDB_PAGE_SIZE: usize = 20;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    async fn get_page(&self, path: &str, query: &[(&str, &str)]) -> AppResult<TmdbPage> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let response = check_status(response, "TMDB").await?;
        Ok(response.json().await?)
    }
}

/// Discover pages required to collect `limit` movies
fn pages_needed(limit: usize) -> u32 {
    limit.div_ceil(TMDB_PAGE_SIZE).max(1) as u32
}

/// First `limit` movies of a page, wrapped as raw records
fn into_records(page: TmdbPage, limit: usize) -> Vec<RawRecord> {
    page.results
        .into_iter()
        .take(limit)
        .map(RawRecord::Movie)
        .collect()
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn lookup_by_title(&self, title: &str) -> AppResult<Option<RawRecord>> {
        let query = ensure_query(title)?;

        let movie: Option<TmdbMovie> = cached!(
            self.cache,
            CacheKey::TitleLookup(ContentType::Movie, query.to_string()),
            LOOKUP_CACHE_TTL,
            async move {
                let page = self.get_page("/search/movie", &[("query", query)]).await?;
                let movie = page.results.into_iter().next();

                tracing::info!(
                    query = %query,
                    found = movie.is_some(),
                    provider = PROVIDER_NAME,
                    "Title lookup completed"
                );

                Ok::<_, crate::error::AppError>(movie)
            }
        )?;

        Ok(movie.map(RawRecord::Movie))
    }

    async fn fetch_by_genres(&self, genre_ids: &[u32], limit: usize) -> AppResult<Vec<RawRecord>> {
        let genres = genre_param(genre_ids);

        let movies: Vec<TmdbMovie> = cached!(
            self.cache,
            CacheKey::GenrePool(ContentType::Movie, genre_ids.to_vec(), limit),
            POOL_CACHE_TTL,
            async {
                let mut movies: Vec<TmdbMovie> = Vec::with_capacity(limit);
                let mut last_page = pages_needed(limit);
                let mut page_number = 1;

                while movies.len() < limit && page_number <= last_page {
                    let page_param = page_number.to_string();
                    let page = self
                        .get_page(
                            "/discover/movie",
                            &[
                                ("with_genres", genres.as_str()),
                                ("sort_by", "popularity.desc"),
                                ("page", page_param.as_str()),
                            ],
                        )
                        .await?;

                    if let Some(total) = page.total_pages {
                        last_page = last_page.min(total);
                    }
                    if page.results.is_empty() {
                        break;
                    }

                    tracing::debug!(
                        page = page_number,
                        results = page.results.len(),
                        "Discover page fetched"
                    );
                    movies.extend(page.results);
                    page_number += 1;
                }
                movies.truncate(limit);

                tracing::info!(
                    genres = %genres,
                    results = movies.len(),
                    pages = page_number - 1,
                    provider = PROVIDER_NAME,
                    "Candidate pool fetched"
                );

                Ok::<_, crate::error::AppError>(movies)
            }
        )?;

        Ok(into_records(
            TmdbPage {
                results: movies,
                total_pages: None,
            },
            limit,
        ))
    }

    fn clone_for_task(&self) -> Box<dyn CatalogProvider> {
        Box::new(self.clone())
    }

    fn content_type(&self) -> ContentType {
        ContentType::Movie
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
