//! Search module - Fuzzy ranking of snippets
//!
//! This module provides:
//! - Approximate string similarity (`ratio`, `partial_ratio`)
//! - A weighted multi-field search engine over any [`Searchable`] record
//! - Usage-aware ordering for display
//!
//! # Module Structure
//!
//! - `fuzzy` - Indel-based similarity scores
//! - `engine` - `SearchEngine`, `Searchable`, field weights and results
//! - `ranking` - Usage-count tie-breaks and the empty-query browse order

mod engine;
mod fuzzy;
mod ranking;

pub use engine::{FieldWeights, SearchEngine, SearchResult, Searchable, DEFAULT_FUZZY_THRESHOLD};
pub use fuzzy::{partial_ratio, ratio};
pub use ranking::{browse_order, rank_results, search_ranked};

#[cfg(test)]
#[path = "../search_tests.rs"]
mod tests;
