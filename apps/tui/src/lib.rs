//! PresetUI full-screen interface.
//!
//! Renders a launcher form with `ratatui` + `crossterm`: a preset list,
//! checkbox options, parameters, and a live command preview. The caller
//! gets back an [`Outcome`] and decides how to launch.

mod app;
mod dialog;
mod panes;
pub mod theme;
mod widgets;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Report, Result, WrapErr};
use presetui_core::clipboard::SystemClipboard;
use presetui_shared::{AppConfig, PresetUiError, ThemeMode};
use tracing_subscriber::EnvFilter;

pub use app::{App, Outcome, TuiOptions, run};
pub use theme::Theme;

impl TuiOptions {
    /// Theme and clipboard as configured. A broken user style sheet falls
    /// back to the built-in one.
    pub fn from_config(config: &AppConfig, theme_override: Option<ThemeMode>) -> Self {
        let theme = match &config.ui.theme_file {
            Some(file) => Theme::from_file(Path::new(file)).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to built-in theme");
                Theme::builtin()
            }),
            None => Theme::builtin(),
        };
        Self {
            theme,
            theme_mode: theme_override.unwrap_or(config.defaults.theme),
            clipboard: Box::new(SystemClipboard),
        }
    }
}

/// Send tracing output to `path` (appending) so it does not draw over the
/// alternate screen.
pub fn init_file_logging(path: &Path, default_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Exit code of a launched command that failed on its own. The child has
/// already printed its error, so callers exit with this code quietly.
pub fn child_exit_code(report: &Report) -> Option<i32> {
    match report.downcast_ref::<PresetUiError>() {
        Some(PresetUiError::Launch { code, .. }) => *code,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_child_failures_carry_an_exit_code() {
        let failed: Report = PresetUiError::launch("exited with status 3", Some(3)).into();
        assert_eq!(child_exit_code(&failed), Some(3));

        let killed: Report = PresetUiError::launch("terminated by signal", None).into();
        assert_eq!(child_exit_code(&killed), None);

        let other: Report = PresetUiError::config("bad file").into();
        assert_eq!(child_exit_code(&other), None);
    }
}
