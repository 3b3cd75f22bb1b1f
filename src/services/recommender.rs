use std::collections::HashSet;

use crate::{error::EngineError, models::CatalogItem, services::similarity::SimilarityMatrix};

/// Titles most similar to the item at `reference_index`.
///
/// Items are ranked by descending similarity, ties keeping collection order.
/// The reference item and every item whose id is in `exclude_ids` are skipped.
/// At most `count` titles are returned; running out of candidates is not an
/// error.
pub fn recommend(
    items: &[CatalogItem],
    similarity: &SimilarityMatrix,
    reference_index: usize,
    exclude_ids: &HashSet<u64>,
    count: usize,
) -> Result<Vec<String>, EngineError> {
    if reference_index >= items.len() || reference_index >= similarity.len() {
        return Err(EngineError::IndexOutOfRange {
            index: reference_index,
            len: items.len().min(similarity.len()),
        });
    }

    let reference_id = items[reference_index].id;
    let mut ranked: Vec<(usize, f64)> = similarity
        .row(reference_index)
        .iter()
        .copied()
        .enumerate()
        .take(items.len())
        .collect();
    // sort_by is stable, equal scores stay in collection order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let recommendations: Vec<String> = ranked
        .into_iter()
        .filter(|(index, _)| *index != reference_index)
        .map(|(index, _)| &items[index])
        .filter(|item| item.id != reference_id && !exclude_ids.contains(&item.id))
        .take(count)
        .map(|item| item.title.clone())
        .collect();

    tracing::debug!(
        reference = %items[reference_index].title,
        requested = count,
        returned = recommendations.len(),
        "Ranked recommendations"
    );

    Ok(recommendations)
}
