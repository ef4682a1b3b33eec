//! Configuration loading and saving
//!
//! Reads `config.yaml`, creating it with defaults on first run.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, USAGE_FILE_NAME};
use super::types::Config;

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(shellexpand::tilde("~/.quick-snippet").as_ref()))
}

/// `<platform config dir>/quick-snippet-overlay/config.yaml`
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Usage statistics live next to the config file
pub fn default_usage_path() -> PathBuf {
    config_dir().join(USAGE_FILE_NAME)
}

/// Load configuration from `path`.
///
/// This function:
/// 1. Writes a default config file if none exists and returns the defaults
/// 2. Parses the YAML, filling missing keys from defaults
/// 3. Falls back to defaults (with a warning) when the YAML is malformed
///
/// Never fails: a broken config must not stop the app from starting.
#[instrument(name = "load_config", skip_all, fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        info!("Config file not found, creating default");
        let config = Config::default();
        if let Err(e) = save_config(&config, path) {
            warn!(error = %e, "Failed to create default config");
        }
        return config;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Failed to read config file, using defaults");
            return Config::default();
        }
    };

    if content.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Config::default();
    }

    match serde_yaml::from_str::<Config>(&content) {
        Ok(config) => {
            info!(
                hotkey = %config.hotkey,
                snippet_file = %config.snippet_file,
                "Successfully loaded config"
            );
            config
        }
        Err(e) => {
            warn!(error = %e, "Invalid YAML in config file, using defaults");
            Config::default()
        }
    }
}

/// Save configuration atomically (write temp file, then rename over the target)
#[instrument(name = "save_config", skip_all, fields(path = %path.display()))]
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;

    let temp_path = path.with_extension("yaml.tmp");
    std::fs::write(&temp_path, &yaml)
        .with_context(|| format!("Failed to write temp config file: {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;

    info!(bytes = yaml.len(), "Saved config (atomic)");
    Ok(())
}
