//! Local (client-side) candidate filtering.

use crate::autocomplete::AutocompleteConfig;
use crate::label::{Labeler, safe_label};

/// Positions (into `candidates`) of the entries to show for `query`.
///
/// Below `min_chars` (counted on the trimmed, case-folded query) the result is
/// either the first `max_items` candidates or nothing. Otherwise it is every
/// candidate whose case-folded label contains the query, in candidate order,
/// capped at `max_items`.
pub fn filter_candidates<T>(
    candidates: &[T],
    labeler: &dyn Labeler<T>,
    query: &str,
    config: &AutocompleteConfig,
) -> Vec<usize> {
    let needle = query.trim().to_lowercase();

    if needle.chars().count() < config.min_chars {
        if config.show_all_when_empty {
            return (0..candidates.len().min(config.max_items)).collect();
        }
        return Vec::new();
    }

    candidates
        .iter()
        .enumerate()
        .filter(|(_, item)| safe_label(labeler, item).to_lowercase().contains(&needle))
        .map(|(pos, _)| pos)
        .take(config.max_items)
        .collect()
}
