//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Directory under the platform config dir that holds config and usage stats
pub const CONFIG_DIR_NAME: &str = "quick-snippet-overlay";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const USAGE_FILE_NAME: &str = "usage_stats.yaml";

/// Default global hotkey
pub const DEFAULT_HOTKEY: &str = "ctrl+shift+space";

/// Default snippet library location (tilde-expanded on use)
pub const DEFAULT_SNIPPET_FILE: &str = "~/snippets/snippets.yaml";

pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.95;
pub const DEFAULT_THEME: &str = "dark";
pub const DEFAULT_FUZZY_THRESHOLD: u32 = 60;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 150;
pub const DEFAULT_AUTO_RELOAD: bool = true;
pub const DEFAULT_RUN_ON_STARTUP: bool = false;
pub const DEFAULT_OVERLAY_WIDTH: u32 = 600;
pub const DEFAULT_OVERLAY_HEIGHT: u32 = 400;

/// Accepted theme names
pub const VALID_THEMES: &[&str] = &["dark", "light", "system"];

/// Inclusive ranges checked by `Config::validate`
pub const MAX_RESULTS_RANGE: (u32, u32) = (5, 20);
pub const OVERLAY_OPACITY_RANGE: (f64, f64) = (0.7, 1.0);
pub const FUZZY_THRESHOLD_RANGE: (u32, u32) = (40, 80);
pub const SEARCH_DEBOUNCE_RANGE: (u64, u64) = (50, 500);
pub const OVERLAY_WIDTH_RANGE: (u32, u32) = (400, 1200);
pub const OVERLAY_HEIGHT_RANGE: (u32, u32) = (300, 800);

/// One or more modifiers joined by `+`, then a single key
pub const HOTKEY_PATTERN: &str =
    r"(?i)^(ctrl|shift|alt)(\+(ctrl|shift|alt))*\+([a-z0-9]+|space|enter|f\d{1,2})$";
