//! Snippet usage counts
//!
//! Counts how often each snippet has been expanded so frequently used
//! snippets rank first. Stored as YAML:
//!
//! ```yaml
//! snippet_usage:
//!   flask-run: 12
//!   git-uncommit: 3
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Borrowed view for serialization without cloning the map
#[derive(Serialize)]
struct UsageDataRef<'a> {
    snippet_usage: &'a BTreeMap<String, u32>,
}

/// Usage counts keyed by snippet id
#[derive(Debug)]
pub struct UsageTracker {
    counts: BTreeMap<String, u32>,
    file_path: PathBuf,
    /// Set by any change; cleared by load/save
    dirty: bool,
}

impl UsageTracker {
    /// Create an empty tracker for `path`. Call [`UsageTracker::load`] to read it.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        UsageTracker {
            counts: BTreeMap::new(),
            file_path: path.into(),
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Load counts from disk.
    ///
    /// A missing, empty or malformed file yields empty stats. Entries whose
    /// count isn't a non-negative integer are skipped. Only a failed read of
    /// an existing file is an error.
    #[instrument(name = "usage_load", skip(self), fields(path = %self.file_path.display()))]
    pub fn load(&mut self) -> Result<()> {
        self.counts.clear();
        self.dirty = false;

        if !self.file_path.exists() {
            info!("Usage stats file not found, starting with empty stats");
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.file_path).with_context(|| {
            format!("Failed to read usage stats: {}", self.file_path.display())
        })?;

        let data: Value = match serde_yaml::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Failed to parse usage stats YAML, starting with empty stats");
                return Ok(());
            }
        };
        if data.is_null() {
            warn!("Usage stats file is empty, starting with empty stats");
            return Ok(());
        }

        let Some(usage) = data.get("snippet_usage").and_then(Value::as_mapping) else {
            warn!("Usage stats file has invalid structure, starting with empty stats");
            return Ok(());
        };

        for (key, count) in usage {
            let id = match key {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => {
                    warn!(key = ?key, "Invalid snippet id in usage stats, skipping");
                    continue;
                }
            };
            match count.as_u64().and_then(|c| u32::try_from(c).ok()) {
                Some(count) => {
                    self.counts.insert(id, count);
                }
                None => warn!(snippet_id = %id, count = ?count, "Invalid usage count, skipping"),
            }
        }

        info!(entry_count = self.counts.len(), "Loaded usage stats");
        Ok(())
    }

    /// Save to disk using an atomic write (temp file + rename).
    ///
    /// Does nothing when no count changed since the last load or save.
    #[instrument(name = "usage_save", skip(self), fields(path = %self.file_path.display()))]
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            debug!("No changes to save");
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let yaml = serde_yaml::to_string(&UsageDataRef {
            snippet_usage: &self.counts,
        })
        .context("Failed to serialize usage stats")?;

        let temp_path = self.file_path.with_extension("yaml.tmp");
        std::fs::write(&temp_path, &yaml).with_context(|| {
            format!("Failed to write temp usage file: {}", temp_path.display())
        })?;
        std::fs::rename(&temp_path, &self.file_path).with_context(|| {
            format!("Failed to rename temp file to {}", self.file_path.display())
        })?;

        info!(entry_count = self.counts.len(), "Saved usage stats (atomic)");
        self.dirty = false;
        Ok(())
    }

    /// Record one use of a snippet, returning the new count
    pub fn increment(&mut self, snippet_id: &str) -> u32 {
        let count = self.counts.entry(snippet_id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        self.dirty = true;
        debug!(snippet_id = %snippet_id, count = *count, "Incremented usage");
        *count
    }

    /// Times a snippet was used (0 if never)
    pub fn count(&self, snippet_id: &str) -> u32 {
        self.counts.get(snippet_id).copied().unwrap_or(0)
    }

    pub fn all_counts(&self) -> &BTreeMap<String, u32> {
        &self.counts
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drop counts for snippets that no longer exist, returning how many went
    pub fn cleanup_orphaned<'a>(&mut self, valid_ids: impl IntoIterator<Item = &'a str>) -> usize {
        let valid: HashSet<&str> = valid_ids.into_iter().collect();
        let before = self.counts.len();
        self.counts.retain(|id, _| valid.contains(id.as_str()));

        let removed = before - self.counts.len();
        if removed > 0 {
            self.dirty = true;
            info!(removed = removed, "Cleaned up orphaned usage stats");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tracker() -> (UsageTracker, TempDir) {
        let dir = TempDir::new().unwrap();
        let tracker = UsageTracker::with_path(dir.path().join("usage_stats.yaml"));
        (tracker, dir)
    }

    fn tracker_with(content: &str) -> (UsageTracker, TempDir) {
        let (mut tracker, dir) = create_test_tracker();
        fs::write(tracker.path(), content).unwrap();
        tracker.load().unwrap();
        (tracker, dir)
    }

    #[test]
    fn test_new_tracker_is_empty() {
        let (tracker, _dir) = create_test_tracker();
        assert!(tracker.all_counts().is_empty());
        assert_eq!(tracker.count("anything"), 0);
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn test_increment() {
        let (mut tracker, _dir) = create_test_tracker();
        assert_eq!(tracker.increment("flask-run"), 1);
        assert_eq!(tracker.increment("flask-run"), 2);
        tracker.increment("git-uncommit");

        assert_eq!(tracker.count("flask-run"), 2);
        assert_eq!(tracker.count("git-uncommit"), 1);
        assert!(tracker.is_dirty());
    }

    #[test]
    fn test_save_and_load() {
        let (mut tracker, dir) = create_test_tracker();
        tracker.increment("b");
        tracker.increment("a");
        tracker.increment("a");
        tracker.save().unwrap();
        assert!(!tracker.is_dirty());

        let saved = fs::read_to_string(tracker.path()).unwrap();
        assert!(saved.starts_with("snippet_usage:"));
        assert!(saved.find("a: 2").unwrap() < saved.find("b: 1").unwrap());
        assert!(!tracker.path().with_extension("yaml.tmp").exists());

        let mut reloaded = UsageTracker::with_path(dir.path().join("usage_stats.yaml"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count("a"), 2);
        assert_eq!(reloaded.count("b"), 1);
    }

    #[test]
    fn test_save_skipped_when_clean() {
        let (mut tracker, _dir) = create_test_tracker();
        tracker.save().unwrap();
        assert!(!tracker.path().exists());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep").join("usage_stats.yaml");
        let mut tracker = UsageTracker::with_path(path.clone());
        tracker.increment("x");
        tracker.save().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let mut tracker = UsageTracker::with_path("/nonexistent/path/usage_stats.yaml");
        assert!(tracker.load().is_ok());
        assert!(tracker.all_counts().is_empty());
    }

    #[test]
    fn test_load_empty_file() {
        let (tracker, _dir) = tracker_with("");
        assert!(tracker.all_counts().is_empty());
    }

    #[test]
    fn test_load_malformed_yaml() {
        let (tracker, _dir) = tracker_with("snippet_usage: {unclosed");
        assert!(tracker.all_counts().is_empty());
    }

    #[test]
    fn test_load_wrong_structure() {
        let (tracker, _dir) = tracker_with("other_key:\n  a: 1\n");
        assert!(tracker.all_counts().is_empty());

        let (tracker, _dir) = tracker_with("snippet_usage: [1, 2]\n");
        assert!(tracker.all_counts().is_empty());
    }

    #[test]
    fn test_load_skips_invalid_counts() {
        let (tracker, _dir) = tracker_with(
            "snippet_usage:\n  good: 4\n  negative: -1\n  text: lots\n  float: 1.5\n  zero: 0\n",
        );
        let counts = tracker.all_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(tracker.count("good"), 4);
        assert_eq!(tracker.count("zero"), 0);
        assert!(counts.contains_key("zero"));
        assert!(!counts.contains_key("negative"));
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn test_cleanup_orphaned() {
        let (mut tracker, _dir) = tracker_with("snippet_usage:\n  keep: 3\n  gone: 5\n");

        let removed = tracker.cleanup_orphaned(["keep", "unused"]);
        assert_eq!(removed, 1);
        assert_eq!(tracker.count("keep"), 3);
        assert_eq!(tracker.count("gone"), 0);
        assert!(tracker.is_dirty());

        tracker.save().unwrap();
        assert_eq!(tracker.cleanup_orphaned(["keep"]), 0);
        assert!(!tracker.is_dirty());
    }
}
