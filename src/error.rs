use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, warn};

use crate::variables::VariableError;

/// Error severity for user-facing reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,    // informational
    Warning, // recoverable
    Error,   // operation failed
}

/// Domain-specific errors for the snippet library
#[derive(Error, Debug)]
pub enum SnippetError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Snippet with ID '{0}' not found")]
    SnippetNotFound(String),

    #[error("Invalid snippet: {0}")]
    InvalidSnippet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Variable(#[from] VariableError),
}

impl SnippetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnippetError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        SnippetError::Yaml {
            path: path.into(),
            source,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } => ErrorSeverity::Error,
            Self::Yaml { .. } => ErrorSeverity::Warning,
            Self::SnippetNotFound(_) => ErrorSeverity::Error,
            Self::InvalidSnippet(_) => ErrorSeverity::Warning,
            Self::Config(_) => ErrorSeverity::Warning,
            Self::Variable(_) => ErrorSeverity::Info,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("Could not access {}", path.display()),
            Self::Yaml { path, .. } => format!("Could not parse {}", path.display()),
            Self::SnippetNotFound(id) => format!("No snippet with ID '{}'", id),
            Self::InvalidSnippet(msg) => msg.clone(),
            Self::Config(msg) => format!("Configuration issue: {}", msg),
            Self::Variable(VariableError::MissingValue { name }) => {
                format!("A value for '{}' is required", name)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SnippetError>;

/// Extension trait for logging recoverable failures with caller location.
///
/// # Examples
///
/// ```ignore
/// use quick_snippet::error::ResultExt;
///
/// // Keep going with stale stats if the save fails
/// tracker.save().log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_error_converts() {
        let err: SnippetError = VariableError::MissingValue {
            name: "filepath".to_string(),
        }
        .into();
        assert!(err.to_string().contains("filepath"));
        assert_eq!(err.severity(), ErrorSeverity::Info);
        assert_eq!(err.user_message(), "A value for 'filepath' is required");
    }

    #[test]
    fn test_not_found_message() {
        let err = SnippetError::SnippetNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Snippet with ID 'abc' not found");
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = SnippetError::io(
            "/tmp/missing.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing.yaml"));
        assert_eq!(err.user_message(), "Could not access /tmp/missing.yaml");
    }

    #[test]
    fn test_log_err_passes_through_ok() {
        let ok: std::result::Result<u32, String> = Ok(7);
        assert_eq!(ok.log_err(), Some(7));
        let err: std::result::Result<u32, String> = Err("boom".to_string());
        assert_eq!(err.warn_on_err(), None);
    }
}
