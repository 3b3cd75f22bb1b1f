use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod genre;

pub use catalog::{
    CatalogItem, ContentType, JikanDates, JikanEntry, JikanGenre, JikanPage, RawRecord,
    TmdbMovie, TmdbPage,
};
pub use genre::{GenreEntry, GenreVocabulary};

/// Request for a recommendation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub content_type: ContentType,
    /// Titles the user already likes, in the order they were entered
    pub titles: Vec<String>,
    /// Genre ids picked from the content type's genre list
    pub genres: Vec<u32>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub pool_size: Option<usize>,
}

/// What happened when looking up one of the user's titles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeedStatus {
    Found,
    NotFound,
    /// The catalog answered with a record lacking both id and title
    Invalid,
    /// The catalog call itself failed
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedOutcome {
    pub query: String,
    pub status: SeedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

/// Result of a recommendation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub content_type: ContentType,
    /// Title of the item recommendations were ranked against
    pub reference: String,
    pub seeds: Vec<SeedOutcome>,
    pub recommendations: Vec<String>,
    /// Number of distinct items the similarity model was built over
    pub collection_size: usize,
    pub generated_at: DateTime<Utc>,
}
