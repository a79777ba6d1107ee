//! Form engine, preset persistence, and command launching for PresetUI.
//!
//! Presenters (TUI and console) hold a [`form::FormState`] built from a
//! launcher file loaded with [`launcher::load_launcher`], merge saved presets
//! from a [`presets::PresetStore`], and hand the resulting argv to
//! [`launcher::execute`].

pub mod choice;
pub mod clipboard;
pub mod form;
pub mod introspect;
pub mod launcher;
pub mod presets;

#[cfg(test)]
pub(crate) mod test_support;
