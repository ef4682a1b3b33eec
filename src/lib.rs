//! Quick Snippet - Snippet library with fuzzy search and `{{variable}}` templates
//!
//! This library provides the core functionality for finding snippets by
//! approximate text match and expanding their placeholders.

pub mod config;
pub mod error;
pub mod logging;
pub mod search;
pub mod snippets;
pub mod tags;
pub mod usage;

// Placeholder detection and substitution
pub mod variables;
