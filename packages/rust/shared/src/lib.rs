//! Shared types, error model, and configuration for PresetUI.
//!
//! This crate is the foundation depended on by all other PresetUI crates.
//! It provides:
//! - [`PresetUiError`]: the unified error type
//! - Domain types ([`LauncherSpec`], [`CheckboxOption`], [`ParameterOption`],
//!   [`PresetConfig`], [`RunParams`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, Interface, LaunchConfig, ThemeMode, UiConfig, config_dir,
    config_file_path, init_config, init_config_in, load_config, load_config_from, log_file_path,
};
pub use error::{PresetUiError, Result};
pub use types::{
    CheckboxOption, InputOption, LauncherSpec, ParameterOption, PresetConfig, RunParams,
    SelectOption, preset_map,
};
