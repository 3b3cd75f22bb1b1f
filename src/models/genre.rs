use std::collections::BTreeMap;

use serde::Serialize;

/// Mapping from a catalog's numeric genre ids to display names
///
/// One vocabulary exists per catalog. Vocabularies are plain values handed to
/// the feature builder, so several domains can be processed side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreVocabulary {
    genres: BTreeMap<u32, String>,
}

/// One numbered entry of a genre list, as shown to users picking genres
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenreEntry {
    pub id: u32,
    pub name: String,
}

impl GenreVocabulary {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self {
            genres: entries
                .into_iter()
                .map(|(id, name)| (id, name.into()))
                .collect(),
        }
    }

    /// TMDB movie genres
    pub fn tmdb_movies() -> Self {
        Self::new([
            (28, "Action"),
            (12, "Adventure"),
            (35, "Comedy"),
            (18, "Drama"),
            (14, "Fantasy"),
            (27, "Horror"),
            (10749, "Romance"),
            (878, "Science Fiction"),
            (53, "Thriller"),
        ])
    }

    /// Jikan genres, shared by anime and manga lookups
    pub fn jikan() -> Self {
        Self::new([
            (1, "Action"),
            (2, "Adventure"),
            (3, "Carrying"),
            (4, "Comedy"),
            (5, "Demon"),
            (6, "Fantasy"),
            (7, "Game"),
            (8, "Horror"),
            (9, "Josei"),
            (10, "Kids"),
            (11, "Magic"),
            (12, "Martial Arts"),
            (13, "Mecha"),
            (14, "Music"),
            (15, "Mystery"),
            (16, "Psychological"),
            (17, "Romance"),
            (18, "Samurai"),
            (19, "Sci-Fi"),
            (20, "Slice of Life"),
            (21, "Supernatural"),
            (22, "Military"),
            (23, "Historical"),
            (24, "Sports"),
        ])
    }

    pub fn name(&self, genre_id: u32) -> Option<&str> {
        self.genres.get(&genre_id).map(String::as_str)
    }

    pub fn contains(&self, genre_id: u32) -> bool {
        self.genres.contains_key(&genre_id)
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Entries ordered by genre id
    pub fn entries(&self) -> Vec<GenreEntry> {
        self.genres
            .iter()
            .map(|(id, name)| GenreEntry {
                id: *id,
                name: name.clone(),
            })
            .collect()
    }
}
