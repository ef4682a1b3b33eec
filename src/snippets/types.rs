//! Snippet records as stored in the YAML library

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::search::Searchable;
use crate::variables::{detect_variables, VariableDeclaration};

/// A text snippet with search metadata.
///
/// `content` may contain `{{name}}` / `{{name:default}}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created: NaiveDate,
    pub modified: NaiveDate,
}

impl Snippet {
    /// Placeholders declared in `content`, in order of first appearance
    pub fn variables(&self) -> Vec<VariableDeclaration> {
        detect_variables(&self.content)
    }
}

impl Searchable for Snippet {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// User input for a snippet that doesn't exist yet.
///
/// The store derives the id and dates; tags are normalized on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSnippet {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Document layout written back to disk
#[derive(Serialize)]
pub(super) struct SnippetDocumentRef<'a> {
    pub version: u32,
    pub snippets: &'a [Snippet],
}

pub(super) const DOCUMENT_VERSION: u32 = 1;
