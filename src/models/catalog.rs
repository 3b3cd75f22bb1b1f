use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::GenreVocabulary;

/// Kind of content a recommendation run works on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Anime,
    Manga,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Anime => "anime",
            ContentType::Manga => "manga",
        }
    }

    /// Genre vocabulary used by the catalog serving this content type
    pub fn genre_vocabulary(&self) -> GenreVocabulary {
        match self {
            ContentType::Movie => GenreVocabulary::tmdb_movies(),
            ContentType::Anime | ContentType::Manga => GenreVocabulary::jikan(),
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized description of one movie, anime or manga
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub genre_ids: Vec<u32>,
    pub overview: String,
    pub release_date: String,
    /// Carried for display; similarity only looks at genres
    pub vote_average: f64,
    pub vote_count: u64,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Movie entry from TMDB search and discover results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
}

/// Paged result envelope used by TMDB
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

// ============================================================================
// Jikan API Types
// ============================================================================

/// Anime or manga entry from the Jikan API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct JikanEntry {
    #[serde(default)]
    pub mal_id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Vec<JikanGenre>,
    #[serde(default)]
    pub synopsis: Option<String>,
    /// Airing dates, present on anime entries
    #[serde(default)]
    pub aired: Option<JikanDates>,
    /// Publication dates, present on manga entries
    #[serde(default)]
    pub published: Option<JikanDates>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub scored: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JikanGenre {
    pub mal_id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct JikanDates {
    #[serde(default)]
    pub string: Option<String>,
}

/// Data envelope used by Jikan list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct JikanPage {
    #[serde(default)]
    pub data: Vec<JikanEntry>,
}

/// A record as returned by one of the catalog providers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum RawRecord {
    Movie(TmdbMovie),
    Anime(JikanEntry),
    Manga(JikanEntry),
}

impl RawRecord {
    /// Maps the record onto a `CatalogItem`.
    ///
    /// Missing optional fields fall back to empty strings and zeroes. Returns
    /// `None` when the record carries neither an id nor a title.
    pub fn normalize(self) -> Option<CatalogItem> {
        match self {
            RawRecord::Movie(movie) => {
                if movie.id.is_none() && movie.title.is_none() {
                    return None;
                }
                Some(CatalogItem {
                    id: movie.id.unwrap_or_default(),
                    title: movie.title.unwrap_or_default(),
                    genre_ids: movie.genre_ids,
                    overview: movie.overview.unwrap_or_default(),
                    release_date: movie.release_date.unwrap_or_default(),
                    vote_average: movie.vote_average.unwrap_or_default(),
                    vote_count: movie.vote_count.unwrap_or_default(),
                })
            }
            RawRecord::Anime(entry) => {
                let dates = entry.aired.clone();
                normalize_jikan(entry, dates)
            }
            RawRecord::Manga(entry) => {
                let dates = entry.published.clone();
                normalize_jikan(entry, dates)
            }
        }
    }

    /// Provider id of the record, if it has one
    pub fn id(&self) -> Option<u64> {
        match self {
            RawRecord::Movie(movie) => movie.id,
            RawRecord::Anime(entry) | RawRecord::Manga(entry) => entry.mal_id,
        }
    }
}

fn normalize_jikan(entry: JikanEntry, dates: Option<JikanDates>) -> Option<CatalogItem> {
    if entry.mal_id.is_none() && entry.title.is_none() {
        return None;
    }

    Some(CatalogItem {
        id: entry.mal_id.unwrap_or_default(),
        title: entry.title.unwrap_or_default(),
        genre_ids: entry.genres.iter().map(|g| g.mal_id).collect(),
        overview: entry.synopsis.unwrap_or_default(),
        release_date: dates.and_then(|d| d.string).unwrap_or_default(),
        vote_average: entry.score.unwrap_or_default(),
        vote_count: entry.scored.map(|s| s.max(0.0) as u64).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_serde() {
        assert_eq!(serde_json::to_string(&ContentType::Anime).unwrap(), "\"anime\"");
        let parsed: ContentType = serde_json::from_str("\"manga\"").unwrap();
        assert_eq!(parsed, ContentType::Manga);
        assert!(serde_json::from_str::<ContentType>("\"book\"").is_err());
    }

    #[test]
    fn test_manga_shares_anime_vocabulary() {
        assert_eq!(
            ContentType::Manga.genre_vocabulary(),
            ContentType::Anime.genre_vocabulary()
        );
        assert_ne!(
            ContentType::Movie.genre_vocabulary(),
            ContentType::Anime.genre_vocabulary()
        );
    }

    #[test]
    fn test_tmdb_movie_normalization() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "genre_ids": [28, 878, 12],
            "overview": "Cobb, a skilled thief",
            "release_date": "2010-07-15",
            "vote_average": 8.4,
            "vote_count": 35000
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let item = RawRecord::Movie(movie).normalize().unwrap();

        assert_eq!(item.id, 27205);
        assert_eq!(item.title, "Inception");
        assert_eq!(item.genre_ids, vec![28, 878, 12]);
        assert_eq!(item.release_date, "2010-07-15");
        assert_eq!(item.vote_average, 8.4);
        assert_eq!(item.vote_count, 35000);
    }

    #[test]
    fn test_tmdb_missing_optional_fields_default() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"id": 7, "title": "Sparse"}"#).unwrap();
        let item = RawRecord::Movie(movie).normalize().unwrap();

        assert!(item.genre_ids.is_empty());
        assert_eq!(item.overview, "");
        assert_eq!(item.release_date, "");
        assert_eq!(item.vote_average, 0.0);
        assert_eq!(item.vote_count, 0);
    }

    #[test]
    fn test_anime_normalization_uses_aired_string() {
        let json = r#"{
            "mal_id": 5114,
            "title": "Fullmetal Alchemist: Brotherhood",
            "genres": [{"mal_id": 1, "name": "Action"}, {"mal_id": 2, "name": "Adventure"}],
            "synopsis": null,
            "aired": {"string": "Apr 5, 2009 to Jul 4, 2010"},
            "score": 9.1,
            "scored": 2100000
        }"#;

        let entry: JikanEntry = serde_json::from_str(json).unwrap();
        let item = RawRecord::Anime(entry).normalize().unwrap();

        assert_eq!(item.id, 5114);
        assert_eq!(item.genre_ids, vec![1, 2]);
        assert_eq!(item.overview, "");
        assert_eq!(item.release_date, "Apr 5, 2009 to Jul 4, 2010");
        assert_eq!(item.vote_count, 2100000);
    }

    #[test]
    fn test_manga_normalization_uses_published_string() {
        let entry = JikanEntry {
            mal_id: Some(2),
            title: Some("Berserk".to_string()),
            aired: Some(JikanDates {
                string: Some("ignored".to_string()),
            }),
            published: Some(JikanDates {
                string: Some("Aug 25, 1989 to ?".to_string()),
            }),
            ..Default::default()
        };

        let item = RawRecord::Manga(entry).normalize().unwrap();
        assert_eq!(item.release_date, "Aug 25, 1989 to ?");
    }

    #[test]
    fn test_record_without_id_and_title_is_rejected() {
        assert_eq!(RawRecord::Movie(TmdbMovie::default()).normalize(), None);
        assert_eq!(RawRecord::Anime(JikanEntry::default()).normalize(), None);
    }

    #[test]
    fn test_record_with_only_title_is_kept() {
        let entry = JikanEntry {
            title: Some("Untracked".to_string()),
            ..Default::default()
        };
        let item = RawRecord::Anime(entry).normalize().unwrap();
        assert_eq!(item.id, 0);
        assert_eq!(item.title, "Untracked");
    }
}
