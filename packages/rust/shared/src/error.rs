//! Error types for PresetUI.
//!
//! Library crates use [`PresetUiError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all PresetUI operations.
#[derive(Debug, thiserror::Error)]
pub enum PresetUiError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// YAML/TOML parsing error for launcher or preset files.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Data validation error (unknown option id, bad choice, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A preset name that does not exist was requested.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Attempt to modify a preset shipped inside the launcher file.
    #[error("preset '{0}' is defined in the launcher file and cannot be changed here")]
    ReadOnlyPreset(String),

    /// System clipboard access failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Spawning or running the target program failed.
    #[error("launch error: {message}")]
    Launch {
        message: String,
        code: Option<i32>,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PresetUiError>;

impl PresetUiError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a launch error, optionally carrying the child's exit code.
    pub fn launch(msg: impl Into<String>, code: Option<i32>) -> Self {
        Self::Launch {
            message: msg.into(),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PresetUiError::config("home directory unknown");
        assert_eq!(err.to_string(), "config error: home directory unknown");

        let err = PresetUiError::validation("duplicate option id 'mode'");
        assert!(err.to_string().contains("duplicate option id"));

        let err = PresetUiError::ReadOnlyPreset("fast".into());
        assert!(err.to_string().contains("'fast'"));
    }

    #[test]
    fn launch_error_keeps_exit_code() {
        let err = PresetUiError::launch("exited with status 2", Some(2));
        match err {
            PresetUiError::Launch { code, .. } => assert_eq!(code, Some(2)),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
