//! Weighted multi-field fuzzy search over a borrowed record collection
//!
//! Every call rescans the whole collection. There is no index and nothing is
//! cached between queries.

use std::cmp::Ordering;

use super::fuzzy::partial_ratio;

/// Default minimum score for a record to be returned
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 60.0;

/// Text accessors the search engine needs from a record
///
/// Any field may be empty. Empty fields are left out of the score entirely
/// rather than counted as zero.
pub trait Searchable {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn tags(&self) -> &[String];
    fn content(&self) -> &str;
}

/// Relative importance of each field in the combined score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub name: f64,
    pub description: f64,
    pub tags: f64,
    pub content: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        FieldWeights {
            name: 3.0,
            description: 2.0,
            tags: 2.0,
            content: 1.0,
        }
    }
}

/// A record that scored at or above the threshold
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a, R> {
    pub record: &'a R,
    /// Weighted average similarity, 0-100, rounded to 2 decimals
    pub score: f64,
}

/// Fuzzy search engine over a snapshot of records
///
/// The engine only borrows the records. To search a reloaded library, build a
/// new engine over the new collection.
///
/// # Examples
///
/// ```
/// use quick_snippet::search::{SearchEngine, Searchable};
///
/// struct Note { name: String, tags: Vec<String>, body: String }
///
/// impl Searchable for Note {
///     fn name(&self) -> &str { &self.name }
///     fn description(&self) -> &str { "" }
///     fn tags(&self) -> &[String] { &self.tags }
///     fn content(&self) -> &str { &self.body }
/// }
///
/// let notes = vec![Note {
///     name: "Flask development server".into(),
///     tags: vec!["python".into()],
///     body: "flask run --debug".into(),
/// }];
/// let engine = SearchEngine::new(&notes);
/// let results = engine.search("flask", 60.0);
/// assert_eq!(results.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a, R> {
    records: &'a [R],
    weights: FieldWeights,
}

impl<'a, R: Searchable> SearchEngine<'a, R> {
    pub fn new(records: &'a [R]) -> Self {
        Self::with_weights(records, FieldWeights::default())
    }

    pub fn with_weights(records: &'a [R], weights: FieldWeights) -> Self {
        SearchEngine { records, weights }
    }

    pub fn records(&self) -> &'a [R] {
        self.records
    }

    pub fn weights(&self) -> FieldWeights {
        self.weights
    }

    /// Rank records against `query`, keeping those scoring at least `threshold`.
    ///
    /// A blank query returns nothing rather than the whole library. Results
    /// are sorted by score descending; equal scores keep collection order.
    pub fn search(&self, query: &str, threshold: f64) -> Vec<SearchResult<'a, R>> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();

        let mut results: Vec<SearchResult<'a, R>> = self
            .records
            .iter()
            .filter_map(|record| {
                let score = self.score(record, &query);
                (score >= threshold).then_some(SearchResult { record, score })
            })
            .collect();

        // Stable sort: ties stay in collection order
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results
    }

    /// Weighted average of per-field similarity for one record.
    ///
    /// `query` must already be trimmed and lowercased.
    pub fn score(&self, record: &R, query: &str) -> f64 {
        let w = &self.weights;
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        let mut add_field = |similarity: f64, weight: f64| {
            weighted_sum += similarity * weight;
            total_weight += weight;
        };

        let name = record.name();
        if !name.is_empty() {
            add_field(partial_ratio(query, &name.to_lowercase()), w.name);
        }

        let description = record.description();
        if !description.is_empty() {
            add_field(
                partial_ratio(query, &description.to_lowercase()),
                w.description,
            );
        }

        let tags = record.tags();
        if !tags.is_empty() {
            let best_tag = tags
                .iter()
                .map(|tag| partial_ratio(query, &tag.to_lowercase()))
                .fold(0.0f64, f64::max);
            add_field(best_tag, w.tags);
        }

        let content = record.content();
        if !content.is_empty() {
            add_field(partial_ratio(query, &content.to_lowercase()), w.content);
        }

        if total_weight <= 0.0 {
            return 0.0;
        }
        round2(weighted_sum / total_weight)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
