use crate::services::features::FeatureMatrix;

/// Square, symmetric matrix of pairwise cosine similarities
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Similarity of items `i` and `j`. Panics when either index is outside the collection.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.size && j < self.size,
            "similarity index ({}, {}) out of range for {} items",
            i,
            j,
            self.size
        );
        self.values[i * self.size + j]
    }

    /// Similarities of item `i` to every item, in collection order
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(
            i < self.size,
            "similarity row {} out of range for {} items",
            i,
            self.size
        );
        &self.values[i * self.size..(i + 1) * self.size]
    }
}

/// Cosine similarity between every pair of feature rows.
///
/// A pair involving an all-zero row scores 0, while the diagonal is always 1.
pub fn compute_similarity(features: &FeatureMatrix) -> SimilarityMatrix {
    let rows = features.rows();
    let size = rows.len();
    let norms: Vec<f64> = rows.iter().map(|r| r.norm()).collect();
    let mut values = vec![0.0; size * size];

    for i in 0..size {
        values[i * size + i] = 1.0;
        for j in (i + 1)..size {
            let score = if norms[i] == 0.0 || norms[j] == 0.0 {
                0.0
            } else {
                (rows[i].dot(&rows[j]) / (norms[i] * norms[j])).clamp(0.0, 1.0)
            };
            values[i * size + j] = score;
            values[j * size + i] = score;
        }
    }

    tracing::debug!(items = size, "Computed similarity matrix");

    SimilarityMatrix { size, values }
}
