use std::collections::BTreeMap;

use crate::{
    error::EngineError,
    models::{CatalogItem, GenreVocabulary},
    services::stopwords::is_stop_word,
};

/// Sparse count vector, `(column, count)` pairs sorted by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    entries: Vec<(usize, u32)>,
}

impl SparseRow {
    pub fn entries(&self) -> &[(usize, u32)] {
        &self.entries
    }

    pub fn get(&self, column: usize) -> u32 {
        self.entries
            .binary_search_by_key(&column, |(c, _)| *c)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dot(&self, other: &SparseRow) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (ca, va) = self.entries[i];
            let (cb, vb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += va as f64 * vb as f64;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }

    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, v)| (*v as f64) * (*v as f64))
            .sum::<f64>()
            .sqrt()
    }
}

/// Bag-of-words matrix over genre tokens, one row per catalog item
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    vocabulary: Vec<String>,
    rows: Vec<SparseRow>,
}

impl FeatureMatrix {
    /// Tokens in column order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn column_of(&self, token: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(token))
            .ok()
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&SparseRow> {
        self.rows.get(index)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Turns catalog items into genre count vectors
pub struct FeatureBuilder<'a> {
    genres: &'a GenreVocabulary,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(genres: &'a GenreVocabulary) -> Self {
        Self { genres }
    }

    /// Space-joined genre names of an item; unknown genre ids are dropped
    pub fn feature_string(&self, item: &CatalogItem) -> String {
        item.genre_ids
            .iter()
            .filter_map(|id| self.genres.name(*id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Builds the count matrix for `items`, rows in the same order.
    ///
    /// Items without a known genre produce an all-zero row.
    pub fn build(&self, items: &[CatalogItem]) -> Result<FeatureMatrix, EngineError> {
        if items.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let documents: Vec<Vec<String>> = items
            .iter()
            .map(|item| tokenize(&self.feature_string(item)))
            .collect();

        // Columns follow lexicographic token order
        let mut columns: BTreeMap<&str, usize> = BTreeMap::new();
        for token in documents.iter().flatten() {
            columns.insert(token.as_str(), 0);
        }
        for (index, column) in columns.values_mut().enumerate() {
            *column = index;
        }

        let rows = documents
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in tokens {
                    *counts.entry(columns[token.as_str()]).or_insert(0) += 1;
                }
                SparseRow {
                    entries: counts.into_iter().collect(),
                }
            })
            .collect();

        let vocabulary: Vec<String> = columns.keys().map(|t| t.to_string()).collect();

        tracing::debug!(
            items = items.len(),
            vocabulary = vocabulary.len(),
            "Built feature matrix"
        );

        Ok(FeatureMatrix { vocabulary, rows })
    }
}

/// Lowercased word tokens of at least two characters, stop words removed
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() >= 2)
        .map(str::to_lowercase)
        .filter(|word| !is_stop_word(word))
        .collect()
}
