//! Structured JSONL logging to file plus human-readable stderr output.
//!
//! - **JSONL to file** (`<data dir>/quick-snippet/logs/quick-snippet.jsonl`)
//! - **Compact to stderr** for whoever is running the CLI
//!
//! # Usage
//!
//! ```rust,ignore
//! use quick_snippet::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(false);
//!
//! tracing::info!(event_type = "app_start", "Application started");
//! ```
//!
//! Each file line is one JSON object:
//! ```json
//! {"timestamp":"2025-11-04T10:30:45.123Z","level":"INFO","target":"quick_snippet::snippets","fields":{"message":"Loaded snippets","count":6}}
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "quick-snippet.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the dual-output logging system.
///
/// Stderr defaults to `warn` (or `info` when `verbose`); `RUST_LOG` overrides
/// both. If the log file can't be opened, only stderr logging is installed.
pub fn init(verbose: bool) -> LoggingGuard {
    let log_dir = get_log_dir();
    let log_path = log_dir.join(LOG_FILE_NAME);

    let file = fs::create_dir_all(&log_dir)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&log_path));

    let (json_layer, file_guard) = match file {
        Ok(file) => {
            // Non-blocking so a slow disk never stalls a search
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file {}: {}", log_path.display(), e);
            (None, None)
        }
    };

    let default_level = if verbose { "info" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    // try_init: tests and embedders may have installed a subscriber already
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init();

    tracing::info!(
        event_type = "app_lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Logging initialized"
    );

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Get the log directory path
fn get_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("quick-snippet").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("quick-snippet-logs"))
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    get_log_dir().join(LOG_FILE_NAME)
}

// =============================================================================
// STRUCTURED LOGGING HELPERS
// =============================================================================

/// Log a completed search. Only the query length is recorded, never its text.
pub fn log_search_event(query_len: usize, result_count: usize, duration_ms: u64) {
    tracing::info!(
        event_type = "search",
        query_len = query_len,
        result_count = result_count,
        duration_ms = duration_ms,
        "Search completed"
    );
}

/// Log a snippet expansion (variable substitution)
pub fn log_expand_event(snippet_id: &str, variable_count: usize, success: bool) {
    if success {
        tracing::info!(
            event_type = "expand",
            snippet_id = snippet_id,
            variable_count = variable_count,
            success = success,
            "Expanded snippet {}",
            snippet_id
        );
    } else {
        tracing::warn!(
            event_type = "expand",
            snippet_id = snippet_id,
            variable_count = variable_count,
            success = success,
            "Failed to expand snippet {}",
            snippet_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_file_name() {
        let path = log_path();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(LOG_FILE_NAME)
        );
        assert!(path.parent().is_some());
    }

    #[test]
    fn test_helpers_without_subscriber() {
        // No subscriber installed: must be a silent no-op
        log_search_event(4, 2, 1);
        log_expand_event("flask-run", 2, true);
        log_expand_event("flask-run", 2, false);
    }
}
