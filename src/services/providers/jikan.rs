/// Jikan (unofficial MyAnimeList API) provider for anime and manga
///
/// Both content types share the same endpoints shape:
/// 1. Title lookup: /{anime|manga}?q=&limit=1
/// 2. Candidate pool: /{anime|manga}?genres=&limit=
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{ContentType, JikanEntry, JikanPage, RawRecord},
    services::providers::{check_status, ensure_query, genre_param, CatalogProvider},
};
use reqwest::Client as HttpClient;

const LOOKUP_CACHE_TTL: u64 = 3600; // 1 hour
const POOL_CACHE_TTL: u64 = 21600; // 6 hours
/// Largest page Jikan serves in one request
const MAX_PAGE_SIZE: usize = 25;
/// Jikan rate limits at a few requests per second, so titles go one by one
const LOOKUP_CONCURRENCY: usize = 1;

#[derive(Clone)]
pub struct JikanProvider {
    http_client: HttpClient,
    api_url: String,
    content_type: ContentType,
    cache: Cache,
}

impl JikanProvider {
    pub fn anime(cache: Cache, api_url: String) -> Self {
        Self::new(cache, api_url, ContentType::Anime)
    }

    pub fn manga(cache: Cache, api_url: String) -> Self {
        Self::new(cache, api_url, ContentType::Manga)
    }

    fn new(cache: Cache, api_url: String, content_type: ContentType) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            content_type,
            cache,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.api_url, self.content_type)
    }

    fn wrap(&self, entry: JikanEntry) -> RawRecord {
        match self.content_type {
            ContentType::Manga => RawRecord::Manga(entry),
            _ => RawRecord::Anime(entry),
        }
    }

    async fn get_page(&self, query: &[(&str, &str)]) -> AppResult<JikanPage> {
        let response = self
            .http_client
            .get(self.endpoint())
            .query(query)
            .send()
            .await?;

        let response = check_status(response, "Jikan").await?;
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for JikanProvider {
    async fn lookup_by_title(&self, title: &str) -> AppResult<Option<RawRecord>> {
        let query = ensure_query(title)?;

        let entry: Option<JikanEntry> = cached!(
            self.cache,
            CacheKey::TitleLookup(self.content_type, query.to_string()),
            LOOKUP_CACHE_TTL,
            async move {
                let page = self.get_page(&[("q", query), ("limit", "1")]).await?;
                let entry = page.data.into_iter().next();

                tracing::info!(
                    query = %query,
                    found = entry.is_some(),
                    provider = self.name(),
                    content_type = %self.content_type,
                    "Title lookup completed"
                );

                Ok::<_, crate::error::AppError>(entry)
            }
        )?;

        Ok(entry.map(|e| self.wrap(e)))
    }

    async fn fetch_by_genres(&self, genre_ids: &[u32], limit: usize) -> AppResult<Vec<RawRecord>> {
        let genres = genre_param(genre_ids);
        let page_size = limit.clamp(1, MAX_PAGE_SIZE);
        if page_size < limit {
            tracing::debug!(requested = limit, page_size, "Capping Jikan page size");
        }

        let entries: Vec<JikanEntry> = cached!(
            self.cache,
            CacheKey::GenrePool(self.content_type, genre_ids.to_vec(), page_size),
            POOL_CACHE_TTL,
            async {
                let page_size = page_size.to_string();
                let page = self
                    .get_page(&[("genres", genres.as_str()), ("limit", page_size.as_str())])
                    .await?;

                tracing::info!(
                    genres = %genres,
                    results = page.data.len(),
                    provider = self.name(),
                    content_type = %self.content_type,
                    "Candidate pool fetched"
                );

                Ok::<_, crate::error::AppError>(page.data)
            }
        )?;

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|e| self.wrap(e))
            .collect())
    }

    fn lookup_concurrency(&self) -> usize {
        LOOKUP_CONCURRENCY
    }

    fn clone_for_task(&self) -> Box<dyn CatalogProvider> {
        Box::new(self.clone())
    }

    fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn name(&self) -> &'static str {
        "jikan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;

    fn test_cache() -> Cache {
        Cache::new(create_redis_client("redis://127.0.0.1:1").unwrap()).0
    }

    #[tokio::test]
    async fn test_endpoint_per_content_type() {
        let anime = JikanProvider::anime(test_cache(), "https://api.jikan.moe/v4/".to_string());
        let manga = JikanProvider::manga(test_cache(), "https://api.jikan.moe/v4".to_string());

        assert_eq!(anime.endpoint(), "https://api.jikan.moe/v4/anime");
        assert_eq!(manga.endpoint(), "https://api.jikan.moe/v4/manga");
        assert_eq!(manga.content_type(), ContentType::Manga);
    }

    #[tokio::test]
    async fn test_title_lookups_run_one_at_a_time() {
        let anime = JikanProvider::anime(test_cache(), "http://test.local".to_string());
        assert_eq!(anime.lookup_concurrency(), 1);
    }

    #[tokio::test]
    async fn test_wrap_matches_content_type() {
        let entry = JikanEntry {
            mal_id: Some(1),
            ..Default::default()
        };

        let anime = JikanProvider::anime(test_cache(), "http://test.local".to_string());
        let manga = JikanProvider::manga(test_cache(), "http://test.local".to_string());

        assert!(matches!(anime.wrap(entry.clone()), RawRecord::Anime(_)));
        assert!(matches!(manga.wrap(entry), RawRecord::Manga(_)));
    }

    #[test]
    fn test_page_deserialization() {
        let json = r#"{
            "pagination": {"last_visible_page": 1, "has_next_page": false},
            "data": [
                {
                    "mal_id": 20,
                    "title": "Naruto",
                    "genres": [{"mal_id": 1, "type": "anime", "name": "Action"}],
                    "synopsis": "Moments prior to Naruto Uzumaki's birth",
                    "aired": {"from": "2002-10-03T00:00:00+00:00", "string": "Oct 3, 2002 to Feb 8, 2007"},
                    "score": 8.0,
                    "scored": 8.0
                }
            ]
        }"#;

        let page: JikanPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].mal_id, Some(20));
        assert_eq!(page.data[0].genres[0].mal_id, 1);
    }
}
