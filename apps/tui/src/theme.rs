//! Colour palettes parsed from the TOML style sheet.

use std::path::Path;
use std::str::FromStr;

use presetui_shared::{PresetUiError, Result, ThemeMode};
use ratatui::style::Color;
use serde::Deserialize;

/// The style sheet shipped with the crate.
const BUILTIN_THEME: &str = include_str!("../assets/theme.toml");

/// Raw palette as written in the style sheet.
#[derive(Debug, Deserialize)]
struct RawPalette {
    background: String,
    foreground: String,
    border: String,
    focus: String,
    highlight: String,
    accent: String,
    muted: String,
    success: String,
    warning: String,
    error: String,
    preview: String,
    status_bg: String,
    status_fg: String,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    light: RawPalette,
    dark: RawPalette,
}

/// Resolved colours for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub focus: Color,
    pub highlight: Color,
    pub accent: Color,
    pub muted: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub preview: Color,
    pub status_bg: Color,
    pub status_fg: Color,
}

/// Light and dark palettes.
#[derive(Debug, Clone)]
pub struct Theme {
    light: Palette,
    dark: Palette,
}

impl Theme {
    /// The embedded style sheet.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_THEME).unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in theme is invalid");
            Self {
                light: Palette::plain(),
                dark: Palette::plain(),
            }
        })
    }

    /// Load a user style sheet.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PresetUiError::io(path, e))?;
        Self::parse(&content)
            .map_err(|e| PresetUiError::config(format!("theme {}: {e}", path.display())))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawTheme = toml::from_str(content)
            .map_err(|e| PresetUiError::parse(format!("invalid theme: {e}")))?;
        Ok(Self {
            light: Palette::resolve(&raw.light)?,
            dark: Palette::resolve(&raw.dark)?,
        })
    }

    pub fn palette(&self, mode: ThemeMode) -> &Palette {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

impl Palette {
    fn plain() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Reset,
            border: Color::Reset,
            focus: Color::Cyan,
            highlight: Color::Blue,
            accent: Color::Magenta,
            muted: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            preview: Color::Green,
            status_bg: Color::DarkGray,
            status_fg: Color::White,
        }
    }

    fn resolve(raw: &RawPalette) -> Result<Self> {
        Ok(Self {
            background: color(&raw.background)?,
            foreground: color(&raw.foreground)?,
            border: color(&raw.border)?,
            focus: color(&raw.focus)?,
            highlight: color(&raw.highlight)?,
            accent: color(&raw.accent)?,
            muted: color(&raw.muted)?,
            success: color(&raw.success)?,
            warning: color(&raw.warning)?,
            error: color(&raw.error)?,
            preview: color(&raw.preview)?,
            status_bg: color(&raw.status_bg)?,
            status_fg: color(&raw.status_fg)?,
        })
    }
}

fn color(s: &str) -> Result<Color> {
    Color::from_str(s).map_err(|_| PresetUiError::parse(format!("unknown colour '{s}'")))
}
