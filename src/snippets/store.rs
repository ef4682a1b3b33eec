//! YAML-backed snippet library
//!
//! Loading is forgiving: bad entries are skipped, duplicate ids are renamed,
//! and a malformed file leaves the last good state in place. Writes replace
//! the file atomically.

use chrono::{Local, NaiveDate};
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::sample::SAMPLE_LIBRARY;
use super::types::{NewSnippet, Snippet, SnippetDocumentRef, DOCUMENT_VERSION};
use crate::error::{Result, SnippetError};
use crate::tags::normalize_tag;

/// Snippet library bound to one YAML file
#[derive(Debug)]
pub struct SnippetStore {
    path: PathBuf,
    /// Last successfully loaded state
    snippets: Vec<Snippet>,
}

impl SnippetStore {
    /// Create a store for `path`. Nothing is read until [`SnippetStore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnippetStore {
            path: path.into(),
            snippets: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Sorted, de-duplicated tags across the loaded snippets
    pub fn all_tags(&self) -> Vec<String> {
        self.snippets
            .iter()
            .flat_map(|s| s.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Load the library from disk.
    ///
    /// A missing file is replaced by the sample library. An unreadable or
    /// malformed file keeps the previously loaded snippets. Only failing to
    /// write the sample file is an error.
    #[instrument(name = "snippets_load", skip(self), fields(path = %self.path.display()))]
    pub fn load(&mut self) -> Result<&[Snippet]> {
        if !self.path.exists() {
            self.create_sample_file()?;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "Failed to read snippet file, keeping last good state");
                return Ok(&self.snippets);
            }
        };

        let document: Value = match serde_yaml::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "YAML parsing error, keeping last good state");
                return Ok(&self.snippets);
            }
        };

        let Some(entries) = document.get("snippets").and_then(Value::as_sequence) else {
            warn!("Invalid YAML structure (no snippet list), keeping last good state");
            return Ok(&self.snippets);
        };

        let today = today();
        let mut snippets: Vec<Snippet> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let parsed = parse_entry(entry, today);
                if parsed.is_none() {
                    warn!(index = index, "Skipping invalid snippet entry");
                }
                parsed
            })
            .collect();
        fix_duplicate_ids(&mut snippets);

        info!(count = snippets.len(), "Loaded snippets");
        self.snippets = snippets;
        Ok(&self.snippets)
    }

    /// Append a new snippet to the file and return its id.
    ///
    /// The id is derived from the name and made unique with `-1`, `-2`, ...
    /// Entries already in the file are written back untouched, including any
    /// that failed validation on load.
    #[instrument(name = "snippets_add", skip(self, new), fields(name = %new.name))]
    pub fn add_snippet(&mut self, new: NewSnippet) -> Result<String> {
        let name = new.name.trim();
        let content = new.content.trim();
        if name.is_empty() {
            return Err(SnippetError::InvalidSnippet("Name is required".to_string()));
        }
        if content.is_empty() {
            return Err(SnippetError::InvalidSnippet(
                "Content is required".to_string(),
            ));
        }

        let mut document = self.read_raw_document()?;
        let Some(root) = document.as_mapping_mut() else {
            return Err(SnippetError::InvalidSnippet(format!(
                "{} is not a snippet library",
                self.path.display()
            )));
        };

        let entries = root
            .entry(Value::from("snippets"))
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if entries.is_null() {
            *entries = Value::Sequence(Vec::new());
        }
        let Some(entries) = entries.as_sequence_mut() else {
            return Err(SnippetError::InvalidSnippet(
                "'snippets' is not a list".to_string(),
            ));
        };

        let mut existing: HashSet<String> = entries
            .iter()
            .filter_map(|entry| entry.get("id").and_then(scalar_string))
            .collect();
        existing.extend(self.snippets.iter().map(|s| s.id.clone()));

        let base = normalize_tag(name);
        let base = if base.is_empty() { "snippet".to_string() } else { base };
        let id = unique_id(&base, &existing);

        let description = new
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(name);
        let date = today();
        let snippet = Snippet {
            id: id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            content: content.to_string(),
            tags: new
                .tags
                .iter()
                .map(|t| normalize_tag(t))
                .filter(|t| !t.is_empty())
                .collect(),
            created: date,
            modified: date,
        };

        let value = serde_yaml::to_value(&snippet).map_err(|e| self.yaml_err(e))?;
        entries.push(value);

        let yaml = serde_yaml::to_string(&document).map_err(|e| self.yaml_err(e))?;
        self.write_library(&yaml)?;
        info!(id = %id, "Added snippet");

        self.load()?;
        Ok(id)
    }

    /// Remove snippets by id and rewrite the file.
    ///
    /// Nothing is written unless every id exists.
    #[instrument(name = "snippets_delete", skip(self, ids), fields(count = ids.len()))]
    pub fn delete_snippets<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<()> {
        self.load()?;

        for id in ids {
            let id = id.as_ref();
            if self.get(id).is_none() {
                return Err(SnippetError::SnippetNotFound(id.to_string()));
            }
        }
        if ids.is_empty() {
            return Ok(());
        }

        let doomed: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();
        let remaining: Vec<Snippet> = self
            .snippets
            .iter()
            .filter(|s| !doomed.contains(s.id.as_str()))
            .cloned()
            .collect();

        let yaml = serde_yaml::to_string(&SnippetDocumentRef {
            version: DOCUMENT_VERSION,
            snippets: &remaining,
        })
        .map_err(|e| self.yaml_err(e))?;
        self.write_library(&yaml)?;

        info!(deleted = doomed.len(), remaining = remaining.len(), "Deleted snippets");
        self.snippets = remaining;
        Ok(())
    }

    fn create_sample_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SnippetError::io(parent, e))?;
        }
        fs::write(&self.path, SAMPLE_LIBRARY).map_err(|e| SnippetError::io(&self.path, e))?;
        info!(path = %self.path.display(), "Created sample snippets file");
        Ok(())
    }

    fn read_raw_document(&self) -> Result<Value> {
        if !self.path.exists() {
            return Ok(empty_document());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| SnippetError::io(&self.path, e))?;
        let document: Value = serde_yaml::from_str(&content).map_err(|e| self.yaml_err(e))?;
        if document.is_null() {
            return Ok(empty_document());
        }
        Ok(document)
    }

    /// Write via temp file + rename
    fn write_library(&self, yaml: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SnippetError::io(parent, e))?;
        }

        let temp_path = self.path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml).map_err(|e| SnippetError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| SnippetError::io(&self.path, e))?;

        debug!(bytes = yaml.len(), "Saved snippet library (atomic)");
        Ok(())
    }

    fn yaml_err(&self, source: serde_yaml::Error) -> SnippetError {
        SnippetError::yaml(&self.path, source)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn empty_document() -> Value {
    let mut root = Mapping::new();
    root.insert(Value::from("version"), Value::from(DOCUMENT_VERSION));
    root.insert(Value::from("snippets"), Value::Sequence(Vec::new()));
    Value::Mapping(root)
}

/// Strings, numbers and booleans all read as text (`id: 42` is a valid id)
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn required_field(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(scalar_string)
        .filter(|s| !s.trim().is_empty())
}

fn parse_date(entry: &Value, key: &str, fallback: NaiveDate) -> NaiveDate {
    entry
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<NaiveDate>().ok())
        .unwrap_or(fallback)
}

/// Build a snippet from one list entry, or `None` if `id`, `name` or
/// `content` is missing or blank
fn parse_entry(entry: &Value, today: NaiveDate) -> Option<Snippet> {
    let id = required_field(entry, "id")?;
    let name = required_field(entry, "name")?;
    let content = required_field(entry, "content")?;

    let description = entry
        .get("description")
        .and_then(scalar_string)
        .unwrap_or_default();
    let tags = entry
        .get("tags")
        .and_then(Value::as_sequence)
        .map(|seq| seq.iter().filter_map(scalar_string).collect())
        .unwrap_or_default();

    Some(Snippet {
        id,
        name,
        description,
        content,
        tags,
        created: parse_date(entry, "created", today),
        modified: parse_date(entry, "modified", today),
    })
}

/// `base`, or `base-1`, `base-2`, ... whichever is free first
fn unique_id(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1u32..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// The first snippet keeps its id; later repeats get `-1`, `-2`, ...
fn fix_duplicate_ids(snippets: &mut [Snippet]) {
    let mut seen: HashSet<String> = HashSet::new();
    for snippet in snippets.iter_mut() {
        if seen.contains(&snippet.id) {
            let renamed = unique_id(&snippet.id, &seen);
            warn!(id = %snippet.id, renamed = %renamed, "Duplicate snippet ID renamed");
            snippet.id = renamed;
        }
        seen.insert(snippet.id.clone());
    }
}
