//! Form state: checkbox selections, parameter values, and the command they
//! produce.
//!
//! Both presenters (the full-screen TUI and the line-oriented console) drive
//! a [`FormState`]; neither keeps option state of its own.

use presetui_shared::{LauncherSpec, ParameterOption, PresetConfig, PresetUiError, Result, RunParams};
use tracing::{debug, warn};

/// Live state of one launcher form.
#[derive(Debug, Clone)]
pub struct FormState {
    spec: LauncherSpec,
    interpreter: String,
    presets: Vec<PresetConfig>,
    /// Parallel to `spec.checkboxes`.
    checked: Vec<bool>,
    /// Parallel to `spec.parameters`.
    values: Vec<Option<String>>,
    selected_preset: Option<String>,
}

impl FormState {
    /// Create a form at default values. The launcher's built-in presets are
    /// available until [`FormState::set_presets`] replaces them.
    pub fn new(spec: LauncherSpec, interpreter: impl Into<String>) -> Self {
        let checked = spec.checkboxes.iter().map(|c| c.default).collect();
        let values = spec.parameters.iter().map(|p| p.default_value()).collect();
        let presets = spec.presets.clone();
        Self {
            spec,
            interpreter: interpreter.into(),
            presets,
            checked,
            values,
            selected_preset: None,
        }
    }

    pub fn spec(&self) -> &LauncherSpec {
        &self.spec
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    pub fn presets(&self) -> &[PresetConfig] {
        &self.presets
    }

    /// Replace the preset list (e.g. after merging saved presets).
    pub fn set_presets(&mut self, presets: Vec<PresetConfig>) {
        if let Some(name) = &self.selected_preset {
            if !presets.iter().any(|p| &p.name == name) {
                self.selected_preset = None;
            }
        }
        self.presets = presets;
    }

    pub fn selected_preset(&self) -> Option<&str> {
        self.selected_preset.as_deref()
    }

    // -----------------------------------------------------------------------
    // Checkboxes
    // -----------------------------------------------------------------------

    /// State of a checkbox; unknown ids read as unchecked.
    pub fn checkbox(&self, id: &str) -> bool {
        self.checkbox_index(id)
            .map(|i| self.checked[i])
            .unwrap_or(false)
    }

    pub fn checkbox_at(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    pub fn set_checkbox(&mut self, id: &str, on: bool) -> Result<()> {
        let i = self.require_checkbox(id)?;
        self.checked[i] = on;
        Ok(())
    }

    /// Flip a checkbox, returning its new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let i = self.require_checkbox(id)?;
        Ok(self.toggle_at(i))
    }

    /// Flip the checkbox at a declaration index. Out-of-range is a no-op.
    pub fn toggle_at(&mut self, index: usize) -> bool {
        match self.checked.get_mut(index) {
            Some(state) => {
                *state = !*state;
                *state
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Parameters
    // -----------------------------------------------------------------------

    /// Current value of a parameter; unknown or unset reads as `""`.
    pub fn value(&self, id: &str) -> &str {
        self.parameter_index(id)
            .map(|i| self.value_at(i))
            .unwrap_or("")
    }

    pub fn value_at(&self, index: usize) -> &str {
        self.values
            .get(index)
            .and_then(|v| v.as_deref())
            .unwrap_or("")
    }

    /// Set a parameter. Inputs take any text (empty clears); selects only
    /// accept one of their choices and are left unchanged otherwise.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> Result<()> {
        let i = self.require_parameter(id)?;
        self.set_value_at(i, value)
    }

    pub fn set_value_at(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let Some(param) = self.spec.parameters.get(index) else {
            return Err(PresetUiError::validation(format!(
                "no parameter at index {index}"
            )));
        };
        if let ParameterOption::Select(sel) = param {
            if !sel.accepts(&value) {
                return Err(PresetUiError::validation(format!(
                    "'{value}' is not a valid choice for '{}' (choices: {})",
                    sel.id,
                    sel.choices.join(", ")
                )));
            }
        }
        self.values[index] = Some(value);
        Ok(())
    }

    /// Rotate a select parameter through its choices, wrapping around.
    pub fn cycle_select(&mut self, id: &str, forward: bool) -> Result<()> {
        let i = self.require_parameter(id)?;
        self.cycle_select_at(i, forward)
    }

    pub fn cycle_select_at(&mut self, index: usize, forward: bool) -> Result<()> {
        let Some(ParameterOption::Select(sel)) = self.spec.parameters.get(index) else {
            return Err(PresetUiError::validation(format!(
                "parameter at index {index} is not a select"
            )));
        };
        let n = sel.choices.len();
        if n == 0 {
            return Ok(());
        }
        let current = self.values[index]
            .as_ref()
            .and_then(|v| sel.choices.iter().position(|c| c == v));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(pos), true) => (pos + 1) % n,
            (Some(pos), false) => (pos + n - 1) % n,
        };
        self.values[index] = Some(sel.choices[next].clone());
        Ok(())
    }

    /// Back to defaults with no preset selected.
    pub fn reset(&mut self) {
        for (state, opt) in self.checked.iter_mut().zip(&self.spec.checkboxes) {
            *state = opt.default;
        }
        for (value, param) in self.values.iter_mut().zip(&self.spec.parameters) {
            *value = param.default_value();
        }
        self.selected_preset = None;
    }

    // -----------------------------------------------------------------------
    // Presets
    // -----------------------------------------------------------------------

    /// Load a preset into the form. Returns warnings for values that could
    /// not be applied (unknown ids, invalid select choices).
    pub fn apply_preset(&mut self, name: &str) -> Result<Vec<String>> {
        let preset = self
            .presets
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| PresetUiError::PresetNotFound(name.to_string()))?;

        let mut warnings = Vec::new();

        self.checked.iter_mut().for_each(|c| *c = false);
        for id in &preset.checkbox_options {
            match self.checkbox_index(id) {
                Some(i) => self.checked[i] = true,
                None => warnings.push(format!("preset '{name}': unknown checkbox '{id}' ignored")),
            }
        }

        for (value, param) in self.values.iter_mut().zip(&self.spec.parameters) {
            *value = param.default_value();
        }
        for (id, value) in &preset.input_values {
            let Some(i) = self.parameter_index(id) else {
                warnings.push(format!("preset '{name}': unknown parameter '{id}' ignored"));
                continue;
            };
            match &self.spec.parameters[i] {
                ParameterOption::Select(sel) if !sel.accepts(value) => {
                    warnings.push(format!(
                        "preset '{name}': '{value}' is not a choice of '{id}', keeping '{}'",
                        self.value_at(i)
                    ));
                }
                _ => self.values[i] = Some(value.clone()),
            }
        }

        for w in &warnings {
            warn!("{w}");
        }
        debug!(preset = name, "applied preset");
        self.selected_preset = Some(name.to_string());
        Ok(warnings)
    }

    /// The argument tail a preset would produce, without touching this form.
    pub fn preset_preview(&self, name: &str) -> Result<Vec<String>> {
        let mut scratch = self.clone();
        scratch.apply_preset(name)?;
        Ok(scratch.args())
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Checked flags in declaration order, then non-empty parameters as
    /// `arg value` pairs, then the launcher's extra arguments.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .spec
            .checkboxes
            .iter()
            .zip(&self.checked)
            .filter(|(_, on)| **on)
            .map(|(opt, _)| opt.arg.clone())
            .collect();

        for (param, value) in self.spec.parameters.iter().zip(&self.values) {
            if let Some(v) = value.as_deref().map(str::trim) {
                if !v.is_empty() {
                    args.push(param.arg().to_string());
                    args.push(v.to_string());
                }
            }
        }

        args.extend(self.spec.extra_args.iter().cloned());
        args
    }

    /// Program path with wrapping double quotes removed.
    pub fn program(&self) -> &str {
        self.spec.program.trim().trim_matches('"')
    }

    /// Full argv: interpreter (when set), program, arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::new();
        if !self.interpreter.is_empty() {
            argv.push(self.interpreter.clone());
        }
        argv.push(self.program().to_string());
        argv.extend(self.args());
        argv
    }

    /// Display form of [`FormState::argv`].
    pub fn command_preview(&self) -> String {
        display_command(&self.argv())
    }

    /// Snapshot the form as the caller-facing result.
    pub fn collect(&self) -> RunParams {
        let options = self
            .spec
            .checkboxes
            .iter()
            .zip(&self.checked)
            .map(|(opt, on)| (opt.arg.clone(), *on))
            .collect();
        let inputs = self
            .spec
            .parameters
            .iter()
            .zip(&self.values)
            .map(|(p, v)| {
                (
                    p.arg().to_string(),
                    v.as_deref().map(str::trim).unwrap_or("").to_string(),
                )
            })
            .collect();
        RunParams {
            options,
            inputs,
            preset: self.selected_preset.clone(),
        }
    }

    /// Ids of checked checkboxes and every parameter's value, for saving.
    pub fn snapshot(&self) -> (Vec<String>, Vec<(String, String)>) {
        let checked = self
            .spec
            .checkboxes
            .iter()
            .zip(&self.checked)
            .filter(|(_, on)| **on)
            .map(|(opt, _)| opt.id.clone())
            .collect();
        let values = self
            .spec
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id().to_string(), self.value_at(i).to_string()))
            .collect();
        (checked, values)
    }

    fn checkbox_index(&self, id: &str) -> Option<usize> {
        self.spec.checkboxes.iter().position(|c| c.id == id)
    }

    fn parameter_index(&self, id: &str) -> Option<usize> {
        self.spec.parameters.iter().position(|p| p.id() == id)
    }

    fn require_checkbox(&self, id: &str) -> Result<usize> {
        self.checkbox_index(id)
            .ok_or_else(|| PresetUiError::validation(format!("unknown checkbox '{id}'")))
    }

    fn require_parameter(&self, id: &str) -> Result<usize> {
        self.parameter_index(id)
            .ok_or_else(|| PresetUiError::validation(format!("unknown parameter '{id}'")))
    }
}

/// Join argv for display, single-quoting tokens a shell would split.
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|t| display_token(t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_token(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '$' | '`' | '\\'));
    if needs_quotes {
        format!("'{}'", token.replace('\'', r"'\''"))
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::demo_spec;

    fn form() -> FormState {
        FormState::new(demo_spec(), "python")
    }

    #[test]
    fn new_form_uses_defaults() {
        let f = form();
        assert!(f.checkbox("verbose"));
        assert!(!f.checkbox("force"));
        assert_eq!(f.value("count"), "10");
        assert_eq!(f.value("output"), "");
        assert_eq!(f.value("mode"), "normal");
        assert!(f.selected_preset().is_none());
    }

    #[test]
    fn unknown_ids_read_as_empty() {
        let f = form();
        assert!(!f.checkbox("missing"));
        assert_eq!(f.value("missing"), "");
    }

    #[test]
    fn args_follow_declaration_order() {
        let f = form();
        assert_eq!(
            f.args(),
            vec!["--verbose", "--count", "10", "--mode", "normal", "--tail"]
        );
    }

    #[test]
    fn command_preview_strips_program_quotes() {
        let f = form();
        assert_eq!(
            f.command_preview(),
            "python demo.py --verbose --count 10 --mode normal --tail"
        );
    }

    #[test]
    fn command_preview_quotes_values_with_spaces() {
        let mut f = form();
        f.set_value("output", "my file.txt").unwrap();
        assert!(f.command_preview().contains("--output 'my file.txt'"));
        assert!(f.argv().contains(&"my file.txt".to_string()));
    }

    #[test]
    fn empty_interpreter_runs_program_directly() {
        let f = FormState::new(demo_spec(), "");
        assert_eq!(f.argv()[0], "demo.py");
    }

    #[test]
    fn whitespace_only_values_are_omitted() {
        let mut f = form();
        f.set_value("count", "   ").unwrap();
        assert!(!f.args().contains(&"--count".to_string()));
    }

    #[test]
    fn select_rejects_unknown_choice() {
        let mut f = form();
        let err = f.set_value("mode", "warp").unwrap_err();
        assert!(err.to_string().contains("not a valid choice"));
        assert_eq!(f.value("mode"), "normal");
    }

    #[test]
    fn cycle_select_wraps() {
        let mut f = form();
        f.cycle_select("mode", true).unwrap();
        assert_eq!(f.value("mode"), "safe");
        f.cycle_select("mode", true).unwrap();
        assert_eq!(f.value("mode"), "fast");
        f.cycle_select("mode", false).unwrap();
        assert_eq!(f.value("mode"), "safe");
        assert!(f.cycle_select("count", true).is_err());
    }

    #[test]
    fn toggle_flips_state() {
        let mut f = form();
        assert!(f.toggle("force").unwrap());
        assert!(!f.toggle("force").unwrap());
        assert!(f.toggle("ghost").is_err());
    }

    #[test]
    fn apply_preset_resets_then_applies() {
        let mut f = form();
        f.set_value("output", "x.log").unwrap();
        let warnings = f.apply_preset("quick").unwrap();
        assert!(warnings.is_empty());
        assert!(!f.checkbox("verbose"), "checkboxes cleared before applying");
        assert!(f.checkbox("force"));
        assert_eq!(f.value("count"), "50");
        assert_eq!(f.value("output"), "", "unlisted parameters back to default");
        assert_eq!(f.value("mode"), "fast");
        assert_eq!(f.selected_preset(), Some("quick"));
    }

    #[test]
    fn apply_preset_keeps_default_for_invalid_choice() {
        let mut f = form();
        let warnings = f.apply_preset("broken").unwrap();
        assert_eq!(warnings.len(), 3);
        assert_eq!(f.value("mode"), "normal");
        assert!(!f.checkbox("verbose"));
    }

    #[test]
    fn apply_unknown_preset_is_error_and_noop() {
        let mut f = form();
        let err = f.apply_preset("nope").unwrap_err();
        assert!(matches!(err, PresetUiError::PresetNotFound(_)));
        assert!(f.checkbox("verbose"));
    }

    #[test]
    fn preset_preview_leaves_form_untouched() {
        let f = form();
        let args = f.preset_preview("quick").unwrap();
        assert_eq!(args, vec!["--force", "--count", "50", "--mode", "fast", "--tail"]);
        assert!(f.checkbox("verbose"));
        assert_eq!(f.value("count"), "10");
        assert!(f.selected_preset().is_none());
    }

    #[test]
    fn collect_reports_every_option() {
        let mut f = form();
        f.apply_preset("quick").unwrap();
        let params = f.collect();
        assert_eq!(
            params.options,
            vec![("--verbose".into(), false), ("--force".into(), true)]
        );
        assert_eq!(params.inputs[1], ("--output".to_string(), String::new()));
        assert_eq!(params.preset.as_deref(), Some("quick"));
        assert_eq!(params.to_args(&f.spec().extra_args), f.args());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut f = form();
        f.apply_preset("quick").unwrap();
        f.reset();
        assert!(f.checkbox("verbose"));
        assert_eq!(f.value("mode"), "normal");
        assert!(f.selected_preset().is_none());
    }

    #[test]
    fn set_presets_drops_stale_selection() {
        let mut f = form();
        f.apply_preset("quick").unwrap();
        f.set_presets(Vec::new());
        assert!(f.selected_preset().is_none());
    }

    #[test]
    fn display_token_escapes_single_quotes() {
        assert_eq!(display_token("it's"), r"'it'\''s'");
        assert_eq!(display_token(""), "''");
        assert_eq!(display_token("plain"), "plain");
    }
}
