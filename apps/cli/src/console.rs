//! Line-oriented presenter: panels, a preset table, and numbered prompts.
//!
//! Reads answers from any `BufRead` and writes to any `Write`, so the whole
//! flow runs against in-memory buffers in tests. End of input answers every
//! prompt with its default.

use std::io::{BufRead, Write};

use color_eyre::eyre::Result;
use crossterm::style::{Color, Stylize};
use presetui_core::choice::{self, PresetChoice};
use presetui_core::clipboard::Clipboard;
use presetui_core::form::{FormState, display_command};
use presetui_shared::{ParameterOption, RunParams};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

/// What the preset prompt decided.
enum PresetStep {
    /// No preset applied; continue to the option editors.
    Edit,
    /// A preset was applied; skip straight to the preview.
    Applied,
    /// Repeated-digit shortcut: apply and return at once.
    Run,
}

pub(crate) struct Console<R, W> {
    input: R,
    output: W,
    clipboard: Box<dyn Clipboard>,
    color: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub(crate) fn new(input: R, output: W, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            input,
            output,
            clipboard,
            color: false,
        }
    }

    /// Emit ANSI colours (only when writing to a terminal).
    pub(crate) fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Walk the user through the form and return the collected values.
    pub(crate) fn run(&mut self, form: &mut FormState) -> Result<RunParams> {
        let title = form.spec().title.clone();
        self.panel(&title, None, Color::Blue)?;

        let step = if form.presets().is_empty() {
            PresetStep::Edit
        } else {
            self.clipboard_panel()?;
            self.preset_table(form)?;
            self.preset_prompt(form)?
        };

        match step {
            PresetStep::Run => {
                self.say("Configuration collected, running...", Color::Green)?;
                return Ok(form.collect());
            }
            PresetStep::Edit => {
                self.checkbox_step(form)?;
                self.parameter_step(form)?;
            }
            PresetStep::Applied => {}
        }

        let preview = form.command_preview();
        self.panel(&preview, Some("Command preview"), Color::Green)?;
        self.say("Configuration collected, running...", Color::Green)?;
        Ok(form.collect())
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    fn clipboard_panel(&mut self) -> Result<()> {
        match self.clipboard.get_text() {
            Ok(text) if !text.trim().is_empty() => {
                self.panel(&text, Some("Clipboard"), Color::Yellow)?;
                writeln!(self.output)?;
            }
            Ok(_) => {}
            Err(e) => self.say(&format!("Unable to read clipboard: {e}"), Color::Red)?,
        }
        Ok(())
    }

    fn preset_table(&mut self, form: &FormState) -> Result<()> {
        let mut rows = Vec::with_capacity(form.presets().len());
        for (i, preset) in form.presets().iter().enumerate() {
            let args = form.preset_preview(&preset.name)?;
            let args = if args.is_empty() {
                "(no arguments)".to_string()
            } else {
                display_command(&args)
            };
            rows.push([
                (i + 1).to_string(),
                preset.name.clone(),
                preset.description.clone(),
                args,
            ]);
        }

        let header = ["#", "Name", "Description", "Arguments"];
        let colors = [Color::Cyan, Color::Green, Color::Yellow, Color::Magenta];
        let mut widths = header.map(UnicodeWidthStr::width);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.width());
            }
        }

        let rule = |l: &str, m: &str, r: &str| {
            let parts: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{l}{}{r}", parts.join(m))
        };

        writeln!(self.output, "{}", self.paint("Presets", Color::Blue, true))?;
        writeln!(self.output, "{}", self.paint(&rule("╭", "┬", "╮"), Color::Blue, false))?;
        let head: Vec<String> = header
            .iter()
            .zip(widths)
            .map(|(h, w)| self.paint(&pad(h, w), Color::Reset, true))
            .collect();
        self.table_row(&head)?;
        writeln!(self.output, "{}", self.paint(&rule("├", "┼", "┤"), Color::Blue, false))?;
        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .zip(colors)
                .map(|((cell, w), c)| self.paint(&pad(cell, w), c, false))
                .collect();
            self.table_row(&cells)?;
        }
        writeln!(self.output, "{}", self.paint(&rule("╰", "┴", "╯"), Color::Blue, false))?;

        writeln!(self.output)?;
        writeln!(self.output, "{}", self.paint("Usage:", Color::Reset, true))?;
        writeln!(self.output, "  • a preset number (e.g. 2): apply it")?;
        writeln!(self.output, "  • the number twice (e.g. 22): apply it and run")?;
        writeln!(self.output, "  • 0: skip presets and edit options")?;
        Ok(())
    }

    fn table_row(&mut self, cells: &[String]) -> Result<()> {
        let bar = self.paint("│", Color::Blue, false);
        let joined: Vec<String> = cells.iter().map(|c| format!(" {c} ")).collect();
        writeln!(self.output, "{bar}{}{bar}", joined.join(&bar))?;
        Ok(())
    }

    fn preset_prompt(&mut self, form: &mut FormState) -> Result<PresetStep> {
        let answer = self.ask("Choose a preset", "1")?;
        let names: Vec<String> = form.presets().iter().map(|p| p.name.clone()).collect();

        let (index, run) = match choice::parse_preset_choice(&answer, names.len()) {
            PresetChoice::Default => (0, false),
            PresetChoice::Select(i) => (i, false),
            PresetChoice::SelectAndRun(i) => (i, true),
            PresetChoice::Skip => {
                self.say("Skipping presets", Color::Yellow)?;
                return Ok(PresetStep::Edit);
            }
            PresetChoice::Invalid => {
                self.say("Invalid preset number, skipping presets", Color::Yellow)?;
                return Ok(PresetStep::Edit);
            }
        };

        let name = &names[index];
        for warning in form.apply_preset(name)? {
            self.say(&warning, Color::Yellow)?;
        }
        debug!(preset = %name, run, "preset chosen");
        if run {
            self.say(&format!("Selected and running preset: {name}"), Color::Green)?;
            Ok(PresetStep::Run)
        } else {
            self.say(&format!("Applied preset: {name}"), Color::Green)?;
            Ok(PresetStep::Applied)
        }
    }

    fn checkbox_step(&mut self, form: &mut FormState) -> Result<()> {
        let count = form.spec().checkboxes.len();
        if count == 0 {
            return Ok(());
        }

        writeln!(self.output, "{}", self.paint("Options:", Color::Reset, true))?;
        for (i, opt) in form.spec().checkboxes.iter().enumerate() {
            let mark = if form.checkbox_at(i) { "✓" } else { " " };
            writeln!(self.output, "{}. [{mark}] {} ({})", i + 1, opt.label, opt.arg)?;
        }
        writeln!(self.output)?;
        self.say(
            "Toggle options (numbers separated by spaces, Enter keeps current)",
            Color::Cyan,
        )?;

        let answer = self.ask("Numbers", "")?;
        if answer.trim().is_empty() {
            return Ok(());
        }
        match choice::parse_toggle_indices(&answer) {
            Some(indices) => {
                for i in 1..=count {
                    if indices.contains(&i) {
                        form.toggle_at(i - 1);
                    }
                }
                self.say("Options updated", Color::Green)?;
            }
            None => self.say("Invalid input, keeping current options", Color::Yellow)?,
        }
        Ok(())
    }

    fn parameter_step(&mut self, form: &mut FormState) -> Result<()> {
        let count = form.spec().parameters.len();
        if count == 0 {
            return Ok(());
        }

        writeln!(self.output)?;
        writeln!(self.output, "{}", self.paint("Parameters:", Color::Reset, true))?;
        for i in 0..count {
            let line = self.parameter_line(form, i);
            writeln!(self.output, "{line}")?;
        }
        writeln!(self.output)?;
        self.say(
            "Set parameters (\"index value\", or just the index to pick a choice; blank line to finish)",
            Color::Cyan,
        )?;

        loop {
            let line = self.ask("Input", "")?;
            if line.trim().is_empty() {
                break;
            }
            let Some(edit) = choice::parse_parameter_edit(&line) else {
                self.say("Index must be a number", Color::Yellow)?;
                continue;
            };
            if edit.index == 0 || edit.index > count {
                self.say(&format!("Index {} is out of range", edit.index), Color::Yellow)?;
                continue;
            }
            let i = edit.index - 1;
            let param = form.spec().parameters[i].clone();

            match (&param, edit.value) {
                (ParameterOption::Input(_), value) => {
                    let value = value.unwrap_or_default();
                    form.set_value_at(i, value.clone())?;
                    let shown = if value.is_empty() { "(empty)" } else { &value };
                    self.say(&format!("Set {}: {shown}", param.label()), Color::Green)?;
                }
                (ParameterOption::Select(sel), Some(value)) => {
                    if form.set_value_at(i, value.clone()).is_ok() {
                        self.say(&format!("Set {}: {value}", sel.label), Color::Green)?;
                    } else {
                        self.say(
                            &format!(
                                "Invalid value '{value}'. Choices: {}",
                                sel.choices.join(", ")
                            ),
                            Color::Yellow,
                        )?;
                    }
                }
                (ParameterOption::Select(sel), None) => {
                    let current = form.value_at(i).to_string();
                    let prompt = format!("Choose {} [{}]", sel.label, sel.choices.join("/"));
                    loop {
                        let answer = self.ask(&prompt, &current)?;
                        let answer = if answer.trim().is_empty() {
                            current.clone()
                        } else {
                            answer.trim().to_string()
                        };
                        if form.set_value_at(i, answer.clone()).is_ok() {
                            self.say(&format!("Selected {}: {answer}", sel.label), Color::Green)?;
                            break;
                        }
                        self.say("Please select one of the available options", Color::Red)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn parameter_line(&self, form: &FormState, i: usize) -> String {
        let param = &form.spec().parameters[i];
        let value = form.value_at(i);
        let default = param.default_value().unwrap_or_default();

        let shown = if value.is_empty() {
            self.paint("not set", Color::DarkGrey, false)
        } else {
            self.paint(value, Color::Cyan, false)
        };
        let mut line = format!("{}. {} ({}): {shown}", i + 1, param.label(), param.arg());

        if value != default {
            let d = if default.is_empty() { "empty" } else { &default };
            line.push_str(&self.paint(&format!(" (default: {d})"), Color::DarkGrey, false));
        }
        match param {
            ParameterOption::Input(input) if !input.placeholder.is_empty() => {
                line.push_str(&self.paint(
                    &format!(" hint: {}", input.placeholder),
                    Color::DarkGrey,
                    false,
                ));
            }
            ParameterOption::Select(sel) => {
                line.push_str(&self.paint(
                    &format!(" choices: {}", sel.choices.join(" / ")),
                    Color::DarkGrey,
                    false,
                ));
            }
            ParameterOption::Input(_) => {}
        }
        line
    }

    // -----------------------------------------------------------------------
    // Output helpers
    // -----------------------------------------------------------------------

    /// Print `prompt [default]: ` and read one line. EOF yields the default.
    fn ask(&mut self, prompt: &str, default: &str) -> Result<String> {
        let hint = if default.is_empty() {
            String::new()
        } else {
            format!(" {}", self.paint(&format!("({default})"), Color::Cyan, true))
        };
        write!(self.output, "{prompt}{hint}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(default.to_string());
        }
        let line = line.trim_end_matches(['\r', '\n']);
        Ok(if line.trim().is_empty() {
            default.to_string()
        } else {
            line.to_string()
        })
    }

    fn say(&mut self, msg: &str, color: Color) -> Result<()> {
        let text = self.paint(msg, color, false);
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Boxed text with an optional title in the top border.
    fn panel(&mut self, body: &str, title: Option<&str>, color: Color) -> Result<()> {
        let lines: Vec<&str> = body.lines().collect();
        let title_len = title.map(|t| t.width() + 2).unwrap_or(0);
        let inner = lines
            .iter()
            .map(|l| l.width())
            .max()
            .unwrap_or(0)
            .max(title_len)
            + 2;

        let top = match title {
            Some(t) => format!("╭─ {t} {}╮", "─".repeat(inner.saturating_sub(title_len + 1))),
            None => format!("╭{}╮", "─".repeat(inner)),
        };
        writeln!(self.output, "{}", self.paint(&top, color, false))?;
        let side = self.paint("│", color, false);
        for line in &lines {
            let text = self.paint(&pad(line, inner - 2), color, true);
            writeln!(self.output, "{side} {text} {side}")?;
        }
        let bottom = format!("╰{}╯", "─".repeat(inner));
        writeln!(self.output, "{}", self.paint(&bottom, color, false))?;
        Ok(())
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled = text.with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}

/// Pad to `width` terminal columns; wide glyphs count double.
pub(crate) fn pad(text: &str, width: usize) -> String {
    format!("{text}{}", " ".repeat(width.saturating_sub(text.width())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use presetui_core::clipboard::MemoryClipboard;
    use presetui_shared::{
        CheckboxOption, InputOption, LauncherSpec, PresetConfig, PresetUiError, Result as SharedResult,
        SelectOption,
    };

    /// A clipboard with no display server behind it.
    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn get_text(&mut self) -> SharedResult<String> {
            Err(PresetUiError::Clipboard("no display".into()))
        }

        fn set_text(&mut self, _text: &str) -> SharedResult<()> {
            Err(PresetUiError::Clipboard("no display".into()))
        }
    }

    fn form(with_presets: bool) -> FormState {
        let spec = LauncherSpec {
            program: "demo.py".into(),
            title: "Demo".into(),
            checkboxes: vec![
                CheckboxOption {
                    label: "Verbose".into(),
                    id: "verbose".into(),
                    arg: "--verbose".into(),
                    default: false,
                },
                CheckboxOption {
                    label: "Force".into(),
                    id: "force".into(),
                    arg: "--force".into(),
                    default: true,
                },
            ],
            parameters: vec![
                ParameterOption::Input(InputOption {
                    label: "Count".into(),
                    id: "count".into(),
                    arg: "--count".into(),
                    default: "10".into(),
                    placeholder: "how many".into(),
                }),
                ParameterOption::Select(SelectOption::new(
                    "Mode",
                    "mode",
                    "--mode",
                    vec!["fast".into(), "normal".into(), "safe".into()],
                    Some("normal".into()),
                )),
            ],
            presets: if with_presets {
                vec![
                    PresetConfig {
                        name: "Empty".into(),
                        description: "nothing".into(),
                        ..Default::default()
                    },
                    PresetConfig {
                        name: "Fast".into(),
                        description: "quick run".into(),
                        checkbox_options: vec!["verbose".into()],
                        input_values: [("mode".into(), "fast".into())].into_iter().collect(),
                    },
                ]
            } else {
                Vec::new()
            },
            ..Default::default()
        };
        FormState::new(spec, "python")
    }

    fn run_console(form: &mut FormState, input: &str, clip: &str) -> (RunParams, String) {
        let mut out = Vec::new();
        let clipboard = MemoryClipboard {
            contents: clip.into(),
        };
        let params = Console::new(input.as_bytes(), &mut out, Box::new(clipboard))
            .run(form)
            .unwrap();
        (params, String::from_utf8(out).unwrap())
    }

    #[test]
    fn blank_answer_applies_first_preset() {
        let mut f = form(true);
        let (params, out) = run_console(&mut f, "\n", "");
        assert_eq!(params.preset.as_deref(), Some("Empty"));
        assert!(out.contains("Applied preset: Empty"));
        assert!(out.contains("--count 10 --mode normal"));
        assert!(out.contains("Command preview"));
        assert!(!out.contains("Options:"));
        // Presets replace checkbox defaults.
        assert_eq!(params.options, vec![("--verbose".into(), false), ("--force".into(), false)]);
    }

    #[test]
    fn repeated_digit_runs_immediately() {
        let mut f = form(true);
        let (params, out) = run_console(&mut f, "22\n", "");
        assert_eq!(params.preset.as_deref(), Some("Fast"));
        assert!(out.contains("Selected and running preset: Fast"));
        assert!(!out.contains("Command preview"));
        assert_eq!(params.inputs[1], ("--mode".into(), "fast".into()));
    }

    #[test]
    fn preset_table_lists_argument_preview() {
        let mut f = form(true);
        let (_, out) = run_console(&mut f, "1\n", "copied text");
        assert!(out.contains("Clipboard"));
        assert!(out.contains("copied text"));
        assert!(out.contains("--verbose --count 10 --mode fast"));
        assert!(out.contains("quick run"));
    }

    #[test]
    fn skip_then_edit_everything() {
        let mut f = form(true);
        let input = "0\n1 2\n1 25\n2 safe\n\n";
        let (params, out) = run_console(&mut f, input, "");
        assert!(out.contains("Skipping presets"));
        assert!(out.contains("Options updated"));
        assert_eq!(params.preset, None);
        assert_eq!(params.options, vec![("--verbose".into(), true), ("--force".into(), false)]);
        assert_eq!(
            params.inputs,
            vec![("--count".into(), "25".into()), ("--mode".into(), "safe".into())]
        );
        assert_eq!(f.command_preview(), "python demo.py --verbose --count 25 --mode safe");
    }

    #[test]
    fn invalid_entries_are_reported_and_ignored() {
        let mut f = form(false);
        let input = "1 x\nabc\n9 1\n2 warp\n\n";
        let (params, out) = run_console(&mut f, input, "");
        assert!(out.contains("Invalid input, keeping current options"));
        assert!(out.contains("Index must be a number"));
        assert!(out.contains("Index 9 is out of range"));
        assert!(out.contains("Invalid value 'warp'. Choices: fast, normal, safe"));
        assert_eq!(params.options[1], ("--force".into(), true));
        assert_eq!(params.inputs[1], ("--mode".into(), "normal".into()));
    }

    #[test]
    fn index_alone_prompts_for_choice_or_clears_input() {
        let mut f = form(false);
        let input = "\n2\nbogus\nsafe\n1\n\n";
        let (params, out) = run_console(&mut f, input, "");
        assert!(out.contains("Please select one of the available options"));
        assert!(out.contains("Selected Mode: safe"));
        assert!(out.contains("Set Count: (empty)"));
        assert_eq!(
            params.inputs,
            vec![("--count".into(), String::new()), ("--mode".into(), "safe".into())]
        );
    }

    #[test]
    fn no_presets_skips_table_and_clipboard() {
        let mut f = form(false);
        let (_, out) = run_console(&mut f, "", "ignored");
        assert!(!out.contains("Clipboard"));
        assert!(!out.contains("Presets"));
        assert!(out.contains("1. [ ] Verbose (--verbose)"));
        assert!(out.contains("2. [✓] Force (--force)"));
        assert!(out.contains("hint: how many"));
        assert!(out.contains("choices: fast / normal / safe"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let mut f = form(true);
        let (_, out) = run_console(&mut f, "1\n", "");
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn clipboard_failure_is_reported_not_fatal() {
        let mut f = form(true);
        let mut out = Vec::new();
        let params = Console::new("2\n".as_bytes(), &mut out, Box::new(BrokenClipboard))
            .run(&mut f)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Unable to read clipboard: clipboard error: no display"), "{out}");
        assert!(out.contains("Applied preset: Fast"));
        assert_eq!(params.preset.as_deref(), Some("Fast"));
    }

    #[test]
    fn wide_preset_names_keep_table_aligned() {
        let mut spec = form(true).spec().clone();
        spec.presets[1].name = "默认配置".into();
        let mut f = FormState::new(spec, "python");

        let (_, out) = run_console(&mut f, "0\n", "");
        let table: Vec<&str> = out
            .lines()
            .skip_while(|l| !l.starts_with('╭') || !l.contains('┬'))
            .take(6)
            .collect();
        assert_eq!(table.len(), 6, "{out}");
        let widths: Vec<usize> = table.iter().map(|l| l.width()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{table:#?}");
        assert!(table[4].contains("默认配置"));
    }

    #[test]
    fn pad_counts_terminal_columns() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("默认", 6), "默认  ");
        assert_eq!(pad("toolong", 3), "toolong");
    }
}
