//! Core TUI application state and event loop.

use std::io;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use presetui_core::clipboard::Clipboard;
use presetui_core::form::FormState;
use presetui_core::presets::{self, PresetEntry, PresetOrigin, PresetStore};
use presetui_shared::{ParameterOption, RunParams, ThemeMode};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing::{debug, info, warn};

use crate::dialog::{DialogAction, SaveDialog};
use crate::panes::{self, Focus};
use crate::theme::Theme;
use crate::widgets::{centered_rect, key_hints, status_bar};

/// How the TUI ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user asked to run the command.
    Run { params: RunParams, argv: Vec<String> },
    /// The user quit without running.
    Quit,
}

/// Options for [`run`].
pub struct TuiOptions {
    pub theme: Theme,
    pub theme_mode: ThemeMode,
    pub clipboard: Box<dyn Clipboard>,
}

/// Application state.
pub struct App {
    pub(crate) form: FormState,
    pub(crate) store: PresetStore,
    pub(crate) entries: Vec<PresetEntry>,
    pub(crate) focus: Focus,
    pub(crate) preset_cursor: usize,
    pub(crate) option_cursor: usize,
    pub(crate) param_cursor: usize,
    /// An input parameter is being typed into.
    pub(crate) editing: bool,
    /// Preset that was just applied with Enter; a second Enter runs it.
    armed_preset: Option<usize>,
    pub(crate) dialog: Option<SaveDialog>,
    pub(crate) show_help: bool,
    pub(crate) theme: Theme,
    pub(crate) theme_mode: ThemeMode,
    pub(crate) status: String,
    clipboard: Box<dyn Clipboard>,
    outcome: Option<Outcome>,
}

impl App {
    pub fn new(form: FormState, store: PresetStore, options: TuiOptions) -> Self {
        let mut app = Self {
            form,
            store,
            entries: Vec::new(),
            focus: Focus::Presets,
            preset_cursor: 0,
            option_cursor: 0,
            param_cursor: 0,
            editing: false,
            armed_preset: None,
            dialog: None,
            show_help: false,
            theme: options.theme,
            theme_mode: options.theme_mode,
            status: "Ready. Press ? for help".to_string(),
            clipboard: options.clipboard,
            outcome: None,
        };
        app.refresh_presets();
        if app.entries.is_empty() {
            app.focus = Focus::Options;
        }
        app
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.outcome.is_some()
    }

    /// Re-merge built-in and saved presets and hand them to the form.
    fn refresh_presets(&mut self) {
        self.entries = presets::merged(&self.form.spec().presets, &self.store);
        self.form
            .set_presets(self.entries.iter().map(|e| e.preset.clone()).collect());
        if self.preset_cursor >= self.entries.len() {
            self.preset_cursor = self.entries.len().saturating_sub(1);
        }
    }

    // -----------------------------------------------------------------------
    // Key handling
    // -----------------------------------------------------------------------

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.outcome = Some(Outcome::Quit);
            return;
        }

        if self.dialog.is_some() {
            self.handle_dialog_key(code);
            return;
        }

        if self.editing {
            self.handle_edit_key(code, modifiers);
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        let armed = self.armed_preset.take();

        match code {
            KeyCode::Char('q') => {
                self.outcome = Some(Outcome::Quit);
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next(self.has_presets());
                self.status = format!("{}", self.focus);
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev(self.has_presets());
                self.status = format!("{}", self.focus);
                return;
            }
            KeyCode::Char('r') => {
                self.run();
                return;
            }
            KeyCode::Char('c') => {
                self.copy_command();
                return;
            }
            KeyCode::Char('s') => {
                self.dialog = Some(SaveDialog::new(self.form.selected_preset()));
                return;
            }
            KeyCode::Char('t') => {
                self.theme_mode = self.theme_mode.toggled();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Presets => self.handle_presets_key(code, armed),
            Focus::Options => self.handle_options_key(code),
            Focus::Parameters => self.handle_parameters_key(code),
        }
    }

    fn has_presets(&self) -> bool {
        !self.entries.is_empty()
    }

    fn handle_presets_key(&mut self, code: KeyCode, armed: Option<usize>) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.preset_cursor = self.preset_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.preset_cursor + 1 < self.entries.len() {
                    self.preset_cursor += 1;
                }
            }
            KeyCode::Enter => {
                let Some(entry) = self.entries.get(self.preset_cursor) else {
                    return;
                };
                let name = entry.preset.name.clone();
                if armed == Some(self.preset_cursor) {
                    self.run();
                    return;
                }
                match self.form.apply_preset(&name) {
                    Ok(warnings) if warnings.is_empty() => {
                        self.status = format!("Applied preset: {name} (Enter again to run)");
                    }
                    Ok(warnings) => {
                        self.status = format!("Applied preset: {name}: {}", warnings.join("; "));
                    }
                    Err(e) => {
                        self.status = e.to_string();
                        return;
                    }
                }
                self.armed_preset = Some(self.preset_cursor);
            }
            KeyCode::Char('x') | KeyCode::Delete => self.delete_preset(),
            _ => {}
        }
    }

    fn handle_options_key(&mut self, code: KeyCode) {
        let count = self.form.spec().checkboxes.len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.option_cursor = self.option_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.option_cursor + 1 < count {
                    self.option_cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.option_cursor < count {
                    self.form.toggle_at(self.option_cursor);
                }
            }
            _ => {}
        }
    }

    fn handle_parameters_key(&mut self, code: KeyCode) {
        let count = self.form.spec().parameters.len();
        let is_select = matches!(
            self.form.spec().parameters.get(self.param_cursor),
            Some(ParameterOption::Select(_))
        );
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.param_cursor = self.param_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.param_cursor + 1 < count {
                    self.param_cursor += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') if is_select => self.cycle(false),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ')
                if is_select =>
            {
                self.cycle(true)
            }
            KeyCode::Enter if self.param_cursor < count => {
                self.editing = true;
                self.status = "Editing: Enter or Esc to finish, Ctrl-U to clear".to_string();
            }
            _ => {}
        }
    }

    fn cycle(&mut self, forward: bool) {
        if let Err(e) = self.form.cycle_select_at(self.param_cursor, forward) {
            self.status = e.to_string();
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let idx = self.param_cursor;
        let mut value = self.form.value_at(idx).to_string();
        match code {
            KeyCode::Enter | KeyCode::Esc => {
                self.editing = false;
                self.status = "Ready".to_string();
                return;
            }
            KeyCode::Tab => {
                self.editing = false;
                if self.param_cursor + 1 < self.form.spec().parameters.len() {
                    self.param_cursor += 1;
                }
                return;
            }
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => value.clear(),
            KeyCode::Char(c) => value.push(c),
            _ => return,
        }
        if let Err(e) = self.form.set_value_at(idx, value) {
            self.status = e.to_string();
        }
    }

    fn handle_dialog_key(&mut self, code: KeyCode) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        match dialog.handle_key(code) {
            DialogAction::None => {}
            DialogAction::Cancel => {
                self.dialog = None;
                self.status = "Save cancelled".to_string();
            }
            DialogAction::Submit { name, description } => {
                self.dialog = None;
                self.save_preset(&name, &description);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    fn run(&mut self) {
        let params = self.form.collect();
        let argv = self.form.argv();
        info!(command = %self.form.command_preview(), "run requested");
        self.outcome = Some(Outcome::Run { params, argv });
    }

    fn copy_command(&mut self) {
        let command = self.form.command_preview();
        self.status = match self.clipboard.set_text(&command) {
            Ok(()) => "Command copied to clipboard".to_string(),
            Err(e) => {
                warn!(error = %e, "copy failed");
                format!("Copy failed: {e}")
            }
        };
    }

    fn save_preset(&mut self, name: &str, description: &str) {
        let result = presets::capture(&self.form, name, description).and_then(|preset| {
            let name = preset.name.clone();
            self.store.upsert(preset);
            self.store.save().map(|()| name)
        });
        match result {
            Ok(name) => {
                self.refresh_presets();
                if let Some(pos) = self.entries.iter().position(|e| e.preset.name == name) {
                    self.preset_cursor = pos;
                }
                debug!(preset = %name, "preset saved from TUI");
                self.status = format!("Preset saved: {name}");
            }
            Err(e) => self.status = format!("Save failed: {e}"),
        }
    }

    fn delete_preset(&mut self) {
        let Some(entry) = self.entries.get(self.preset_cursor) else {
            return;
        };
        let name = entry.preset.name.clone();
        if entry.origin == PresetOrigin::Builtin {
            self.status = format!("'{name}' is defined in the launcher file and cannot be deleted");
            return;
        }
        match presets::delete(&self.form.spec().presets, &mut self.store, &name) {
            Ok(()) => {
                self.refresh_presets();
                if self.entries.is_empty() {
                    self.focus = Focus::Options;
                }
                self.status = format!("Preset deleted: {name}");
            }
            Err(e) => self.status = format!("Delete failed: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal lifecycle
// ---------------------------------------------------------------------------

/// Set up the terminal, run the event loop, and restore the terminal.
pub fn run(form: FormState, store: PresetStore, options: TuiOptions) -> Result<Outcome> {
    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut app = App::new(form, store, options);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(app.outcome.unwrap_or(Outcome::Quit))
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        // Poll with a short timeout so the header clock keeps ticking
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers);
                }
            }
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub(crate) fn draw(f: &mut Frame, app: &App) {
    let palette = *app.theme.palette(app.theme_mode);
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Body
            Constraint::Length(3), // Command preview
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    panes::draw_header(f, chunks[0], app, &palette);
    panes::draw_body(f, chunks[1], app, &palette);
    panes::draw_preview(f, chunks[2], app, &palette);
    f.render_widget(status_bar(&app.status, &palette), chunks[3]);
    f.render_widget(key_hints(app.editing, &palette), chunks[4]);

    if let Some(dialog) = &app.dialog {
        dialog.draw(f, area, &palette);
    }

    if app.show_help {
        draw_help_overlay(f, &palette);
    }
}

fn draw_help_overlay(f: &mut Frame, palette: &crate::theme::Palette) {
    let area = centered_rect(60, 70, f.area());

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from("Keybindings").style(bold),
        Line::from(""),
        Line::from("  Tab/S-Tab    Next/previous pane"),
        Line::from("  ↑/↓ (k/j)    Move within a pane"),
        Line::from("  r            Run the command"),
        Line::from("  c            Copy command to clipboard"),
        Line::from("  s            Save current values as a preset"),
        Line::from("  t            Toggle light/dark theme"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Pane-specific:").style(bold),
        Line::from("  Enter        Apply preset (twice to run) / edit input"),
        Line::from("  x            Delete saved preset"),
        Line::from("  Space        Toggle option"),
        Line::from("  ←/→          Change a choice"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (any key closes) ")
                .border_style(Style::default().fg(palette.border)),
        )
        .style(Style::default().fg(palette.status_fg).bg(palette.status_bg));

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}
