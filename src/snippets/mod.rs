//! Snippets module - The on-disk snippet library
//!
//! # Module Structure
//!
//! - `types` - `Snippet` (searchable record) and `NewSnippet` (user input)
//! - `store` - `SnippetStore`: YAML load/validate, add, delete
//! - `sample` - Starter library written when no file exists

mod sample;
mod store;
mod types;

pub use store::SnippetStore;
pub use types::{NewSnippet, Snippet};

#[cfg(test)]
#[path = "snippets_tests.rs"]
mod tests;
