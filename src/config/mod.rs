//! Configuration module - Application settings and user preferences
//!
//! This module provides functionality for:
//! - Loading configuration from `<config dir>/quick-snippet-overlay/config.yaml`
//! - Default values for all settings
//! - Validation of hotkey, paths, ranges and theme
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values and valid ranges
//! - `types` - The `Config` struct and its validation
//! - `loader` - File system loading and atomic saving

mod defaults;
mod loader;
mod types;

pub use defaults::VALID_THEMES;
pub use loader::{default_config_path, default_usage_path, load_config, save_config};
pub use types::{validate_hotkey, Config};

#[cfg(test)]
pub use defaults::{
    DEFAULT_FUZZY_THRESHOLD, DEFAULT_HOTKEY, DEFAULT_MAX_RESULTS, DEFAULT_SNIPPET_FILE,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
