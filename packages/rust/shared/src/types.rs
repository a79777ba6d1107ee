//! Core domain types for PresetUI launchers.
//!
//! A launcher file describes one target program: the flags it accepts
//! (checkboxes), the value-taking parameters (free-text inputs and
//! enumerated selects), and any presets shipped with it.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PresetUiError, Result};

static OPTION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("valid option id regex"));

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// A boolean flag rendered as a checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxOption {
    /// Human-readable label.
    pub label: String,
    /// Stable identifier referenced by presets.
    pub id: String,
    /// Command-line flag emitted when checked (e.g. `--verbose`).
    pub arg: String,
    /// Initial state.
    #[serde(default)]
    pub default: bool,
}

/// A free-text parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOption {
    pub label: String,
    pub id: String,
    pub arg: String,
    #[serde(default, deserialize_with = "scalar::string")]
    pub default: String,
    /// Hint shown while the field is empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub placeholder: String,
}

/// An enumerated parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub id: String,
    pub arg: String,
    #[serde(deserialize_with = "scalar::string_vec")]
    pub choices: Vec<String>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub default: Option<String>,
}

impl SelectOption {
    /// Build a select option, normalising the default against `choices`.
    pub fn new(
        label: impl Into<String>,
        id: impl Into<String>,
        arg: impl Into<String>,
        choices: Vec<String>,
        default: Option<String>,
    ) -> Self {
        let mut opt = Self {
            label: label.into(),
            id: id.into(),
            arg: arg.into(),
            choices,
            default,
        };
        opt.normalize();
        opt
    }

    /// Keep the default only if it is one of the choices, else fall back
    /// to the first choice (or `None` when there are no choices).
    pub fn normalize(&mut self) {
        let valid = self
            .default
            .as_ref()
            .is_some_and(|d| self.choices.iter().any(|c| c == d));
        if !valid {
            self.default = self.choices.first().cloned();
        }
    }

    /// Whether `value` is an allowed choice.
    pub fn accepts(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c == value)
    }
}

/// A value-taking option: either free text or an enumerated choice.
///
/// Deserialised untagged; an entry carrying `choices` is a select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOption {
    Select(SelectOption),
    Input(InputOption),
}

impl ParameterOption {
    pub fn label(&self) -> &str {
        match self {
            Self::Select(o) => &o.label,
            Self::Input(o) => &o.label,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Select(o) => &o.id,
            Self::Input(o) => &o.id,
        }
    }

    pub fn arg(&self) -> &str {
        match self {
            Self::Select(o) => &o.arg,
            Self::Input(o) => &o.arg,
        }
    }

    /// The value a fresh form starts with.
    pub fn default_value(&self) -> Option<String> {
        match self {
            Self::Select(o) => o.default.clone(),
            Self::Input(o) => Some(o.default.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// A named snapshot of checkbox selections and parameter values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetConfig {
    pub name: String,
    pub description: String,
    /// Ids of the checkboxes that are checked.
    pub checkbox_options: Vec<String>,
    /// Parameter id to value (inputs and selects alike).
    pub input_values: BTreeMap<String, String>,
}

/// On-disk body of a preset; the name is the mapping key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PresetBody {
    #[serde(default)]
    description: String,
    #[serde(default)]
    checkbox_options: Vec<String>,
    #[serde(default, deserialize_with = "scalar::string_map")]
    input_values: BTreeMap<String, String>,
}

/// (De)serialise an ordered list of presets as a `name: body` mapping.
pub mod preset_map {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::{PresetBody, PresetConfig};

    pub fn serialize<S: Serializer>(presets: &[PresetConfig], ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(presets.len()))?;
        for p in presets {
            let body = PresetBody {
                description: p.description.clone(),
                checkbox_options: p.checkbox_options.clone(),
                input_values: p.input_values.clone(),
            };
            map.serialize_entry(&p.name, &body)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<PresetConfig>, D::Error> {
        struct PresetsVisitor;

        impl<'de> Visitor<'de> for PresetsVisitor {
            type Value = Vec<PresetConfig>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of preset name to preset")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Vec::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::new();
                while let Some((name, body)) = access.next_entry::<String, PresetBody>()? {
                    out.push(PresetConfig {
                        name,
                        description: body.description,
                        checkbox_options: body.checkbox_options,
                        input_values: body.input_values,
                    });
                }
                Ok(out)
            }
        }

        de.deserialize_any(PresetsVisitor)
    }
}

// ---------------------------------------------------------------------------
// LauncherSpec
// ---------------------------------------------------------------------------

/// A launcher file: the target program, its options, and built-in presets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherSpec {
    /// Program (script path or executable) to run.
    pub program: String,
    /// Title shown in the UI header.
    #[serde(default = "default_title")]
    pub title: String,
    /// Interpreter to run the program with; `""` runs the program directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,
    /// Arguments always appended after the generated ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
    #[serde(default)]
    pub checkboxes: Vec<CheckboxOption>,
    #[serde(default)]
    pub parameters: Vec<ParameterOption>,
    /// Presets shipped with the launcher (read-only at runtime).
    #[serde(default, with = "preset_map", skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<PresetConfig>,
    /// Where user-saved presets live; relative to the launcher file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets_file: Option<PathBuf>,
}

fn default_title() -> String {
    "PresetUI".into()
}

impl LauncherSpec {
    /// Normalise select defaults after deserialisation.
    pub fn normalize(&mut self) {
        for param in &mut self.parameters {
            if let ParameterOption::Select(sel) = param {
                sel.normalize();
            }
        }
    }

    pub fn checkbox(&self, id: &str) -> Option<&CheckboxOption> {
        self.checkboxes.iter().find(|c| c.id == id)
    }

    pub fn parameter(&self, id: &str) -> Option<&ParameterOption> {
        self.parameters.iter().find(|p| p.id() == id)
    }

    pub fn preset(&self, name: &str) -> Option<&PresetConfig> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Check structural invariants. Returns non-fatal warnings on success.
    pub fn validate(&self) -> Result<Vec<String>> {
        if self.program.trim().is_empty() {
            return Err(PresetUiError::validation("launcher has no program"));
        }

        let mut seen = HashSet::new();
        let all = self
            .checkboxes
            .iter()
            .map(|c| (c.id.as_str(), c.arg.as_str()))
            .chain(self.parameters.iter().map(|p| (p.id(), p.arg())));

        for (id, arg) in all {
            if !OPTION_ID_RE.is_match(id) {
                return Err(PresetUiError::validation(format!("invalid option id '{id}'")));
            }
            if !seen.insert(id) {
                return Err(PresetUiError::validation(format!("duplicate option id '{id}'")));
            }
            if !arg.starts_with('-') {
                return Err(PresetUiError::validation(format!(
                    "option '{id}' has argument '{arg}' which does not start with '-'"
                )));
            }
        }

        for param in &self.parameters {
            if let ParameterOption::Select(sel) = param {
                if sel.choices.is_empty() {
                    return Err(PresetUiError::validation(format!(
                        "select option '{}' has no choices",
                        sel.id
                    )));
                }
            }
        }

        let mut warnings = Vec::new();
        let mut names = HashSet::new();
        for preset in &self.presets {
            if !names.insert(preset.name.as_str()) {
                return Err(PresetUiError::validation(format!(
                    "duplicate preset name '{}'",
                    preset.name
                )));
            }
            for id in &preset.checkbox_options {
                if self.checkbox(id).is_none() {
                    return Err(PresetUiError::validation(format!(
                        "preset '{}' references unknown checkbox '{id}'",
                        preset.name
                    )));
                }
            }
            for (id, value) in &preset.input_values {
                match self.parameter(id) {
                    None => {
                        return Err(PresetUiError::validation(format!(
                            "preset '{}' references unknown parameter '{id}'",
                            preset.name
                        )));
                    }
                    Some(ParameterOption::Select(sel)) if !sel.accepts(value) => {
                        warnings.push(format!(
                            "preset '{}': value '{value}' is not a choice of '{id}'",
                            preset.name
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(warnings)
    }
}

// ---------------------------------------------------------------------------
// RunParams
// ---------------------------------------------------------------------------

/// The collected form result handed back to the caller.
///
/// Serialises as `{"options": {arg: bool}, "inputs": {arg: value}, "preset": name|null}`
/// with keys in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunParams {
    pub options: Vec<(String, bool)>,
    pub inputs: Vec<(String, String)>,
    pub preset: Option<String>,
}

impl RunParams {
    /// Rebuild the argument tail from the collected values.
    pub fn to_args(&self, extra_args: &[String]) -> Vec<String> {
        let mut args: Vec<String> = self
            .options
            .iter()
            .filter(|(_, on)| *on)
            .map(|(arg, _)| arg.clone())
            .collect();
        for (arg, value) in &self.inputs {
            if !value.is_empty() {
                args.push(arg.clone());
                args.push(value.clone());
            }
        }
        args.extend(extra_args.iter().cloned());
        args
    }
}

impl Serialize for RunParams {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        struct Ordered<'a, V>(&'a [(String, V)]);

        impl<V: Serialize> Serialize for Ordered<'_, V> {
            fn serialize<S: serde::Serializer>(
                &self,
                ser: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                ser.collect_map(self.0.iter().map(|(k, v)| (k, v)))
            }
        }

        let mut st = ser.serialize_struct("RunParams", 3)?;
        st.serialize_field("options", &Ordered(&self.options))?;
        st.serialize_field("inputs", &Ordered(&self.inputs))?;
        st.serialize_field("preset", &self.preset)?;
        st.end()
    }
}

// ---------------------------------------------------------------------------
// Scalar coercion
// ---------------------------------------------------------------------------

/// YAML scalars (`10`, `true`, `1.5`) accepted where strings are expected.
mod scalar {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    impl From<Scalar> for String {
        fn from(s: Scalar) -> Self {
            match s {
                Scalar::Str(s) => s,
                Scalar::Int(i) => i.to_string(),
                // Whole floats keep their `.0`, as YAML wrote them.
                Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.1}"),
                Scalar::Float(f) => f.to_string(),
                Scalar::Bool(b) => b.to_string(),
            }
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(Option::<Scalar>::deserialize(de)?
            .map(String::from)
            .unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(de)?.map(String::from))
    }

    pub fn string_vec<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        Ok(Vec::<Scalar>::deserialize(de)?
            .into_iter()
            .map(String::from)
            .collect())
    }

    pub fn string_map<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<BTreeMap<String, String>, D::Error> {
        Ok(Option::<BTreeMap<String, Option<Scalar>>>::deserialize(de)?
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.map(String::from).unwrap_or_default()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = r#"
program: demo.py
title: Demo
checkboxes:
  - { label: Verbose output, id: verbose, arg: --verbose }
  - { label: Force, id: force, arg: --force, default: true }
parameters:
  - { label: Count, id: count, arg: --count, default: 10 }
  - { label: Level, id: level, arg: --level, choices: [1, 2, 3], default: 2 }
  - { label: Mode, id: mode, arg: --mode, choices: [fast, normal], default: turbo }
presets:
  Default:
    description: basic
    checkbox_options: [verbose]
    input_values: { count: 10, mode: normal }
  Advanced:
    description: everything on
    checkbox_options: [verbose, force]
    input_values: { count: "50", level: 3 }
"#;

    fn demo() -> LauncherSpec {
        let mut spec: LauncherSpec = serde_yaml::from_str(DEMO).expect("parse demo");
        spec.normalize();
        spec
    }

    #[test]
    fn parses_launcher_with_scalar_coercion() {
        let spec = demo();
        assert_eq!(spec.checkboxes.len(), 2);
        assert!(spec.checkboxes[1].default);
        match &spec.parameters[0] {
            ParameterOption::Input(i) => assert_eq!(i.default, "10"),
            other => panic!("expected input, got {other:?}"),
        }
        match &spec.parameters[1] {
            ParameterOption::Select(s) => {
                assert_eq!(s.choices, vec!["1", "2", "3"]);
                assert_eq!(s.default.as_deref(), Some("2"));
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn select_default_falls_back_to_first_choice() {
        let spec = demo();
        assert_eq!(
            spec.parameter("mode").and_then(|p| p.default_value()).as_deref(),
            Some("fast")
        );

        let empty = SelectOption::new("x", "x", "--x", vec![], Some("a".into()));
        assert_eq!(empty.default, None);
    }

    #[test]
    fn presets_keep_file_order() {
        let spec = demo();
        let names: Vec<_> = spec.presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Default", "Advanced"]);
        assert_eq!(spec.presets[1].input_values["level"], "3");
    }

    #[test]
    fn validate_accepts_demo() {
        let warnings = demo().validate().expect("valid");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut spec = demo();
        spec.checkboxes[1].id = "verbose".into();
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate option id 'verbose'"));
    }

    #[test]
    fn validate_rejects_arg_without_dash() {
        let mut spec = demo();
        spec.checkboxes[0].arg = "verbose".into();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_preset_reference() {
        let mut spec = demo();
        spec.presets[0].checkbox_options.push("ghost".into());
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("unknown checkbox 'ghost'"));
    }

    #[test]
    fn validate_warns_on_bad_select_value() {
        let mut spec = demo();
        spec.presets[0]
            .input_values
            .insert("mode".into(), "warp".into());
        let warnings = spec.validate().expect("still valid");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("warp"));
    }

    #[test]
    fn run_params_serialize_in_declaration_order() {
        let params = RunParams {
            options: vec![("--zeta".into(), true), ("--alpha".into(), false)],
            inputs: vec![("--count".into(), "3".into())],
            preset: Some("Default".into()),
        };
        let json = serde_json::to_string(&params).expect("serialize");
        assert_eq!(
            json,
            r#"{"options":{"--zeta":true,"--alpha":false},"inputs":{"--count":"3"},"preset":"Default"}"#
        );
    }

    #[test]
    fn run_params_to_args_skips_empty_values() {
        let params = RunParams {
            options: vec![("--a".into(), true), ("--b".into(), false)],
            inputs: vec![("--x".into(), String::new()), ("--y".into(), "v".into())],
            preset: None,
        };
        assert_eq!(
            params.to_args(&["tail".into()]),
            vec!["--a", "--y", "v", "tail"]
        );
    }

    #[test]
    fn float_choices_keep_their_decimal_point() {
        let yaml = "program: x.py\nparameters:\n  - { label: Scale, id: scale, arg: --scale, choices: [0.5, 1.0, 2.0], default: 1.0 }\n  - { label: Ratio, id: ratio, arg: --ratio, default: 2.0 }\n";
        let mut spec: LauncherSpec = serde_yaml::from_str(yaml).expect("parse");
        spec.normalize();
        match &spec.parameters[0] {
            ParameterOption::Select(s) => {
                assert_eq!(s.choices, vec!["0.5", "1.0", "2.0"]);
                assert_eq!(s.default.as_deref(), Some("1.0"));
            }
            other => panic!("expected select, got {other:?}"),
        }
        assert_eq!(spec.parameters[1].default_value().as_deref(), Some("2.0"));
    }
}
