//! Application configuration for PresetUI.
//!
//! User config lives at `~/.presetui/presetui.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PresetUiError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "presetui.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".presetui";

/// Log file written while the TUI owns the terminal.
const LOG_FILE_NAME: &str = "presetui.log";

// ---------------------------------------------------------------------------
// Config structs (matching presetui.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub launch: LaunchConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Which presenter `presetui run` opens when no flag is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    #[default]
    Tui,
    Console,
}

/// Colour scheme of the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Interpreter used when neither the env nor the launcher names one.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    #[serde(default)]
    pub interface: Interface,

    #[serde(default)]
    pub theme: ThemeMode,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            interface: Interface::default(),
            theme: ThemeMode::default(),
        }
    }
}

fn default_interpreter() -> String {
    "python".into()
}

/// `[launch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Look for a virtual-env interpreter next to the working directory.
    #[serde(default = "default_true")]
    pub use_venv: bool,

    /// Virtual-env directory names searched, in order.
    #[serde(default = "default_venv_names")]
    pub venv_names: Vec<String>,

    /// Env var that, when set, overrides the interpreter.
    #[serde(default = "default_interpreter_env")]
    pub interpreter_env: String,

    /// Print the command instead of running it.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            use_venv: true,
            venv_names: default_venv_names(),
            interpreter_env: default_interpreter_env(),
            dry_run: false,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_venv_names() -> Vec<String> {
    ["venv", ".venv", "env", ".env"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_interpreter_env() -> String {
    "PYTHON_PATH".into()
}

/// `[ui]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Optional theme file replacing the built-in style sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_file: Option<String>,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.presetui/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PresetUiError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.presetui/presetui.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Path of the log file used while the TUI is active.
pub fn log_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(LOG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PresetUiError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PresetUiError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_in(&config_dir()?)
}

/// Write a default config file into `dir`, creating it if needed.
pub fn init_config_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| PresetUiError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PresetUiError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PresetUiError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("interpreter"));
        assert!(toml_str.contains("PYTHON_PATH"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.interpreter, "python");
        assert_eq!(parsed.launch.venv_names, vec!["venv", ".venv", "env", ".env"]);
        assert!(parsed.launch.use_venv);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
interface = "console"
theme = "dark"

[launch]
use_venv = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.interface, Interface::Console);
        assert_eq!(config.defaults.theme, ThemeMode::Dark);
        assert_eq!(config.defaults.interpreter, "python");
        assert!(!config.launch.use_venv);
        assert_eq!(config.launch.interpreter_env, "PYTHON_PATH");
    }

    #[test]
    fn init_config_writes_loadable_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = init_config_in(dir.path()).expect("init");
        let loaded = load_config_from(&path).expect("load");
        assert_eq!(loaded.defaults.interface, Interface::Tui);
    }

    #[test]
    fn malformed_config_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("presetui.toml");
        std::fs::write(&path, "[defaults\ninterpreter = 3").expect("write");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
    }
}
