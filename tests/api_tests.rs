use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use streamsaga::{
    error::{AppError, AppResult},
    models::{ContentType, JikanEntry, JikanGenre, RawRecord, TmdbMovie},
    routes::{create_router, AppState, Catalog},
    services::{providers::CatalogProvider, recommendations::RecommendationDefaults},
};

/// In-memory catalog standing in for TMDB and Jikan
#[derive(Clone)]
struct FakeCatalog {
    content_type: ContentType,
    records: Vec<RawRecord>,
}

impl FakeCatalog {
    fn title_of(record: &RawRecord) -> Option<&str> {
        match record {
            RawRecord::Movie(m) => m.title.as_deref(),
            RawRecord::Anime(e) | RawRecord::Manga(e) => e.title.as_deref(),
        }
    }

    fn genres_of(record: &RawRecord) -> Vec<u32> {
        match record {
            RawRecord::Movie(m) => m.genre_ids.clone(),
            RawRecord::Anime(e) | RawRecord::Manga(e) => {
                e.genres.iter().map(|g| g.mal_id).collect()
            }
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn lookup_by_title(&self, title: &str) -> AppResult<Option<RawRecord>> {
        if title.eq_ignore_ascii_case("explode") {
            return Err(AppError::ExternalApi("catalog unavailable".to_string()));
        }
        Ok(self
            .records
            .iter()
            .find(|r| Self::title_of(r).is_some_and(|t| t.eq_ignore_ascii_case(title)))
            .cloned())
    }

    async fn fetch_by_genres(&self, genre_ids: &[u32], limit: usize) -> AppResult<Vec<RawRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| Self::genres_of(r).iter().any(|g| genre_ids.contains(g)))
            .take(limit)
            .cloned()
            .collect())
    }

    fn clone_for_task(&self) -> Box<dyn CatalogProvider> {
        Box::new(self.clone())
    }

    fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn movie(id: u64, title: &str, genre_ids: &[u32]) -> RawRecord {
    RawRecord::Movie(TmdbMovie {
        id: Some(id),
        title: Some(title.to_string()),
        genre_ids: genre_ids.to_vec(),
        ..Default::default()
    })
}

fn jikan(id: u64, title: &str, genres: &[u32]) -> JikanEntry {
    JikanEntry {
        mal_id: Some(id),
        title: Some(title.to_string()),
        genres: genres
            .iter()
            .map(|g| JikanGenre {
                mal_id: *g,
                name: None,
            })
            .collect(),
        ..Default::default()
    }
}

fn create_test_server() -> TestServer {
    let movies = FakeCatalog {
        content_type: ContentType::Movie,
        records: vec![
            movie(1, "Raiders of the Lost Ark", &[28, 12]),
            movie(2, "Die Hard", &[28]),
            movie(3, "Moonlight", &[18]),
            movie(4, "The Mummy", &[28, 12, 14]),
        ],
    };
    let anime = FakeCatalog {
        content_type: ContentType::Anime,
        records: vec![
            RawRecord::Anime(jikan(1, "Cowboy Bebop", &[1, 19])),
            RawRecord::Anime(jikan(2, "Planetes", &[19, 22])),
            RawRecord::Anime(jikan(3, "K-On!", &[4, 14, 20])),
        ],
    };
    let manga = FakeCatalog {
        content_type: ContentType::Manga,
        records: vec![RawRecord::Manga(jikan(7, "Berserk", &[1, 6]))],
    };

    let state = Arc::new(AppState {
        movie: Catalog::new(Arc::new(movies)),
        anime: Catalog::new(Arc::new(anime)),
        manga: Catalog::new(Arc::new(manga)),
        defaults: RecommendationDefaults::default(),
    });

    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_genre_list_for_movies() {
    let server = create_test_server();
    let response = server.get("/api/v1/genres/movie").await;
    response.assert_status_ok();

    let genres: Vec<Value> = response.json();
    assert_eq!(genres.len(), 9);
    assert_eq!(genres[0], json!({ "id": 12, "name": "Adventure" }));
}

#[tokio::test]
async fn test_genre_list_shared_by_anime_and_manga() {
    let server = create_test_server();
    let anime: Vec<Value> = server.get("/api/v1/genres/anime").await.json();
    let manga: Vec<Value> = server.get("/api/v1/genres/manga").await.json();
    assert_eq!(anime.len(), 24);
    assert_eq!(anime, manga);
}

#[tokio::test]
async fn test_title_search_found() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("content_type", "manga")
        .add_query_param("q", "berserk")
        .await;

    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(item["id"], 7);
    assert_eq!(item["title"], "Berserk");
    assert_eq!(item["genre_ids"], json!([1, 6]));
}

#[tokio::test]
async fn test_title_search_not_found() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("content_type", "movie")
        .add_query_param("q", "Nonexistent")
        .await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_movie_recommendations() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "content_type": "movie",
            "titles": ["Raiders of the Lost Ark", "Not A Movie", "explode"],
            "genres": [28, 18],
            "count": 2
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["content_type"], "movie");
    assert_eq!(body["reference"], "Raiders of the Lost Ark");
    assert_eq!(body["recommendations"], json!(["The Mummy", "Die Hard"]));
    assert_eq!(body["collection_size"], 4);
    assert_eq!(body["seeds"][0]["status"], "found");
    assert_eq!(body["seeds"][1]["status"], "not_found");
    assert_eq!(body["seeds"][2]["status"], "failed");
}

#[tokio::test]
async fn test_anime_recommendations() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "content_type": "anime",
            "titles": ["Cowboy Bebop"],
            "genres": [19, 4]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recommendations"], json!(["Planetes", "K-On!"]));
}

#[tokio::test]
async fn test_unknown_genre_is_bad_request() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "content_type": "movie",
            "titles": ["Die Hard"],
            "genres": [1]
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unknown movie genre id 1");
}

#[tokio::test]
async fn test_nothing_found_is_unprocessable() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "content_type": "manga",
            "titles": ["Unknown"],
            "genres": [24]
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}
