//! Host-level ordering layered on top of raw search results
//!
//! The search engine only orders by relevance. The overlay shows the
//! snippets the user actually reaches for first, so usage counts become the
//! primary key here and the search score breaks ties.

use std::cmp::Ordering;

use super::engine::{SearchEngine, SearchResult, Searchable};

/// Reorder search results by usage count, then score, and keep the top `limit`.
///
/// `usage_count` maps a record to how many times it has been used.
pub fn rank_results<'a, R, F>(
    mut results: Vec<SearchResult<'a, R>>,
    usage_count: F,
    limit: usize,
) -> Vec<SearchResult<'a, R>>
where
    F: Fn(&R) -> u32,
{
    results.sort_by(|a, b| {
        usage_count(b.record)
            .cmp(&usage_count(a.record))
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
    });
    results.truncate(limit);
    results
}

/// Order for the empty-query view: most used first, then by name.
pub fn browse_order<'a, R, F>(records: &'a [R], usage_count: F, limit: usize) -> Vec<&'a R>
where
    R: Searchable,
    F: Fn(&R) -> u32,
{
    let mut ordered: Vec<&R> = records.iter().collect();
    ordered.sort_by(|a, b| {
        usage_count(b)
            .cmp(&usage_count(a))
            .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
    });
    ordered.truncate(limit);
    ordered
}

/// Run a search and apply usage ranking in one step.
pub fn search_ranked<'a, R, F>(
    engine: &SearchEngine<'a, R>,
    query: &str,
    threshold: f64,
    usage_count: F,
    limit: usize,
) -> Vec<SearchResult<'a, R>>
where
    R: Searchable,
    F: Fn(&R) -> u32,
{
    rank_results(engine.search(query, threshold), usage_count, limit)
}
