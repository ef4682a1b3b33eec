//! Configuration type definitions

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::OnceLock;

use super::defaults::*;

/// Application settings, stored as YAML.
///
/// Keys missing from the file take their default value. Keys this version
/// doesn't know about are kept in `extra` so saving doesn't drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global hotkey, e.g. `ctrl+shift+space`
    pub hotkey: String,
    /// Path to the snippet library (may start with `~`)
    pub snippet_file: String,
    /// Results shown per search (5-20)
    pub max_results: u32,
    /// Overlay window opacity (0.7-1.0)
    pub overlay_opacity: f64,
    /// `dark`, `light` or `system`
    pub theme: String,
    /// Minimum search score to display (40-80)
    pub fuzzy_threshold: u32,
    /// Delay before searching after a keystroke (50-500 ms)
    pub search_debounce_ms: u64,
    /// Reload the library when the file changes on disk
    pub auto_reload: bool,
    pub run_on_startup: bool,
    pub overlay_width: u32,
    pub overlay_height: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hotkey: DEFAULT_HOTKEY.to_string(),
            snippet_file: DEFAULT_SNIPPET_FILE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            theme: DEFAULT_THEME.to_string(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            auto_reload: DEFAULT_AUTO_RELOAD,
            run_on_startup: DEFAULT_RUN_ON_STARTUP,
            overlay_width: DEFAULT_OVERLAY_WIDTH,
            overlay_height: DEFAULT_OVERLAY_HEIGHT,
            extra: BTreeMap::new(),
        }
    }
}

fn hotkey_regex() -> Option<&'static Regex> {
    static HOTKEY_RE: OnceLock<Option<Regex>> = OnceLock::new();
    HOTKEY_RE.get_or_init(|| Regex::new(HOTKEY_PATTERN).ok()).as_ref()
}

fn check_range<T>(errors: &mut Vec<String>, field: &str, value: T, range: (T, T))
where
    T: PartialOrd + std::fmt::Display,
{
    let (min, max) = range;
    if value < min || value > max {
        errors.push(format!(
            "{} value {} out of range [{}, {}]",
            field, value, min, max
        ));
    }
}

impl Config {
    /// Snippet library path with `~` expanded
    pub fn snippet_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(self.snippet_file.trim()).as_ref())
    }

    /// Search threshold as the engine expects it
    pub fn threshold(&self) -> f64 {
        f64::from(self.fuzzy_threshold)
    }

    /// Check every field, returning one message per problem (empty when valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = validate_hotkey(&self.hotkey);

        if self.snippet_file.trim().is_empty() {
            errors.push("Snippet file path cannot be empty".to_string());
        }

        check_range(&mut errors, "max_results", self.max_results, MAX_RESULTS_RANGE);
        check_range(
            &mut errors,
            "overlay_opacity",
            self.overlay_opacity,
            OVERLAY_OPACITY_RANGE,
        );
        check_range(
            &mut errors,
            "fuzzy_threshold",
            self.fuzzy_threshold,
            FUZZY_THRESHOLD_RANGE,
        );
        check_range(
            &mut errors,
            "search_debounce_ms",
            self.search_debounce_ms,
            SEARCH_DEBOUNCE_RANGE,
        );
        check_range(&mut errors, "overlay_width", self.overlay_width, OVERLAY_WIDTH_RANGE);
        check_range(
            &mut errors,
            "overlay_height",
            self.overlay_height,
            OVERLAY_HEIGHT_RANGE,
        );

        if !VALID_THEMES.contains(&self.theme.as_str()) {
            errors.push(format!(
                "Invalid theme '{}', must be one of: {}",
                self.theme,
                VALID_THEMES.join(", ")
            ));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Valid: `ctrl+shift+space`, `alt+f1`, `ctrl+alt+shift+k`.
/// Invalid: `space` (no modifier), `ctrl+ctrl+k`, `hyper+k`.
pub fn validate_hotkey(hotkey: &str) -> Vec<String> {
    if hotkey.is_empty() {
        return vec!["Hotkey cannot be empty".to_string()];
    }

    let matches = hotkey_regex().is_some_and(|re| re.is_match(hotkey));
    if !matches {
        return vec![
            format!("Invalid hotkey format: '{}'", hotkey),
            "Format: (ctrl|shift|alt)+...+key".to_string(),
        ];
    }

    let lowered = hotkey.to_lowercase();
    let parts: Vec<&str> = lowered.split('+').collect();
    let modifiers = &parts[..parts.len() - 1];
    let unique: HashSet<&&str> = modifiers.iter().collect();
    if unique.len() != modifiers.len() {
        return vec![format!("Duplicate modifiers in hotkey: '{}'", hotkey)];
    }

    Vec::new()
}
