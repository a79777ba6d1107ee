//! Preset persistence.
//!
//! User-saved presets live in a YAML file next to the launcher:
//!
//! ```yaml
//! presets:
//!   Fast:
//!     description: tuned for speed
//!     checkbox_options: [verbose]
//!     input_values: { count: "200", mode: fast }
//! ```
//!
//! Presets shipped inside the launcher file are read-only; saved presets
//! with the same name shadow them.

use std::path::{Path, PathBuf};

use presetui_shared::{PresetConfig, PresetUiError, Result, preset_map};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::form::FormState;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PresetFile {
    #[serde(default, with = "preset_map")]
    presets: Vec<PresetConfig>,
}

/// Where a preset in a merged list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOrigin {
    /// Defined in the launcher file.
    Builtin,
    /// Defined in the user's preset file.
    Saved,
}

/// A preset together with its origin.
#[derive(Debug, Clone)]
pub struct PresetEntry {
    pub preset: PresetConfig,
    pub origin: PresetOrigin,
}

/// Ordered, file-backed collection of saved presets.
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    presets: Vec<PresetConfig>,
}

impl PresetStore {
    /// Load presets from `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "preset file not found, starting empty");
            return Ok(Self {
                path,
                presets: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| PresetUiError::io(&path, e))?;
        let file: PresetFile = if content.trim().is_empty() {
            PresetFile::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                PresetUiError::config(format!("failed to parse {}: {e}", path.display()))
            })?
        };

        debug!(path = %path.display(), count = file.presets.len(), "loaded presets");
        Ok(Self {
            path,
            presets: file.presets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresetConfig> {
        self.presets.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&PresetConfig> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Insert or replace by name. A replaced preset keeps its position.
    pub fn upsert(&mut self, preset: PresetConfig) {
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    /// Remove a saved preset by name.
    pub fn remove(&mut self, name: &str) -> Result<PresetConfig> {
        let idx = self
            .presets
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| PresetUiError::PresetNotFound(name.to_string()))?;
        Ok(self.presets.remove(idx))
    }

    /// Write the store to disk atomically (temp file + rename).
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PresetUiError::io(parent, e))?;
        }

        let file = PresetFile {
            presets: self.presets.clone(),
        };
        let yaml = serde_yaml::to_string(&file)
            .map_err(|e| PresetUiError::validation(format!("YAML serialization failed: {e}")))?;

        let tmp = self.path.with_extension("yaml.tmp");
        std::fs::write(&tmp, yaml).map_err(|e| PresetUiError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| PresetUiError::io(&self.path, e))?;

        info!(path = %self.path.display(), count = self.presets.len(), "saved presets");
        Ok(())
    }
}

/// Built-in presets in file order, then saved ones. A saved preset with a
/// built-in's name takes the built-in's place.
pub fn merged(builtin: &[PresetConfig], saved: &PresetStore) -> Vec<PresetEntry> {
    let mut out: Vec<PresetEntry> = builtin
        .iter()
        .map(|p| match saved.get(&p.name) {
            Some(s) => PresetEntry {
                preset: s.clone(),
                origin: PresetOrigin::Saved,
            },
            None => PresetEntry {
                preset: p.clone(),
                origin: PresetOrigin::Builtin,
            },
        })
        .collect();

    for p in saved.iter() {
        if !builtin.iter().any(|b| b.name == p.name) {
            out.push(PresetEntry {
                preset: p.clone(),
                origin: PresetOrigin::Saved,
            });
        }
    }
    out
}

/// Remove a preset from the saved store, refusing built-in ones.
pub fn delete(builtin: &[PresetConfig], saved: &mut PresetStore, name: &str) -> Result<()> {
    if saved.get(name).is_none() && builtin.iter().any(|b| b.name == name) {
        return Err(PresetUiError::ReadOnlyPreset(name.to_string()));
    }
    saved.remove(name)?;
    saved.save()
}

/// Snapshot the current form as a named preset.
pub fn capture(form: &FormState, name: &str, description: &str) -> Result<PresetConfig> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PresetUiError::validation("preset name cannot be empty"));
    }
    let (checkbox_options, values) = form.snapshot();
    Ok(PresetConfig {
        name: name.to_string(),
        description: description.trim().to_string(),
        checkbox_options,
        input_values: values.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::demo_spec;

    fn preset(name: &str) -> PresetConfig {
        PresetConfig {
            name: name.into(),
            description: format!("{name} description"),
            checkbox_options: vec!["verbose".into()],
            input_values: [("count".into(), "7".into())].into_iter().collect(),
        }
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::load(dir.path().join("none.yaml")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("demo.presets.yaml");

        let mut store = PresetStore::load(&path).unwrap();
        store.upsert(preset("zeta"));
        store.upsert(preset("默认配置"));
        store.upsert(preset("alpha"));
        store.save().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("默认配置"), "unicode written verbatim: {raw}");
        assert!(!path.with_extension("yaml.tmp").exists());

        let loaded = PresetStore::load(&path).unwrap();
        assert_eq!(loaded.names(), vec!["zeta", "默认配置", "alpha"]);
        assert_eq!(loaded.get("alpha").unwrap().input_values["count"], "7");
    }

    #[test]
    fn upsert_replaces_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PresetStore::load(dir.path().join("p.yaml")).unwrap();
        store.upsert(preset("a"));
        store.upsert(preset("b"));
        let mut changed = preset("a");
        changed.description = "new".into();
        store.upsert(changed);
        assert_eq!(store.names(), vec!["a", "b"]);
        assert_eq!(store.get("a").unwrap().description, "new");
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PresetStore::load(dir.path().join("p.yaml")).unwrap();
        let err = store.remove("ghost").unwrap_err();
        assert!(matches!(err, PresetUiError::PresetNotFound(_)));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "presets: [not, a, map").unwrap();
        let err = PresetStore::load(&path).unwrap_err();
        assert!(matches!(err, PresetUiError::Config { .. }), "{err:?}");
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn merged_shadows_builtin_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PresetStore::load(dir.path().join("p.yaml")).unwrap();
        store.upsert(preset("extra"));
        let mut shadow = preset("quick");
        shadow.description = "mine".into();
        store.upsert(shadow);

        let spec = demo_spec();
        let entries = merged(&spec.presets, &store);
        let names: Vec<_> = entries.iter().map(|e| e.preset.name.as_str()).collect();
        assert_eq!(names, vec!["quick", "broken", "extra"]);
        assert_eq!(entries[0].origin, PresetOrigin::Saved);
        assert_eq!(entries[0].preset.description, "mine");
        assert_eq!(entries[1].origin, PresetOrigin::Builtin);
    }

    #[test]
    fn delete_refuses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PresetStore::load(dir.path().join("p.yaml")).unwrap();
        let spec = demo_spec();
        let err = delete(&spec.presets, &mut store, "quick").unwrap_err();
        assert!(matches!(err, PresetUiError::ReadOnlyPreset(_)));
    }

    #[test]
    fn delete_saved_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.yaml");
        let mut store = PresetStore::load(&path).unwrap();
        store.upsert(preset("mine"));
        store.save().unwrap();

        delete(&[], &mut store, "mine").unwrap();
        assert!(PresetStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn capture_snapshots_form() {
        let mut form = FormState::new(demo_spec(), "python");
        form.toggle("force").unwrap();
        form.set_value("output", "out.log").unwrap();

        let p = capture(&form, "  snap ", " desc ").unwrap();
        assert_eq!(p.name, "snap");
        assert_eq!(p.description, "desc");
        assert_eq!(p.checkbox_options, vec!["verbose", "force"]);
        assert_eq!(p.input_values["output"], "out.log");
        assert_eq!(p.input_values["mode"], "normal");

        assert!(capture(&form, "   ", "").is_err());
    }
}
