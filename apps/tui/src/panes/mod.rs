//! The form panes and how they are laid out for the terminal width.

mod options;
mod parameters;
mod presets;

use std::fmt;

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::theme::Palette;

/// Pane that receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Presets,
    Options,
    Parameters,
}

impl Focus {
    const ALL: [Focus; 3] = [Focus::Presets, Focus::Options, Focus::Parameters];

    /// Next pane in tab order, skipping the preset list when it is empty.
    pub(crate) fn next(self, has_presets: bool) -> Self {
        self.step(1, has_presets)
    }

    pub(crate) fn prev(self, has_presets: bool) -> Self {
        self.step(Self::ALL.len() - 1, has_presets)
    }

    fn step(self, by: usize, has_presets: bool) -> Self {
        let mut idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        loop {
            idx = (idx + by) % Self::ALL.len();
            let candidate = Self::ALL[idx];
            if has_presets || candidate != Focus::Presets {
                return candidate;
            }
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presets => write!(f, "Presets"),
            Self::Options => write!(f, "Options"),
            Self::Parameters => write!(f, "Parameters"),
        }
    }
}

/// Arrangement of the body panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayoutMode {
    /// All panes stacked vertically.
    Narrow,
    /// Presets over options on the left, parameters on the right.
    Normal,
    /// One column per pane.
    Wide,
}

pub(crate) fn layout_mode(width: u16) -> LayoutMode {
    match width {
        0..60 => LayoutMode::Narrow,
        60..=100 => LayoutMode::Normal,
        _ => LayoutMode::Wide,
    }
}

pub(crate) fn draw_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let clock = Local::now().format("%H:%M:%S").to_string();
    let title = format!(" {} ", app.form.spec().title);
    let program = format!(" {}", app.form.program());

    let pad = (area.width as usize)
        .saturating_sub(title.width() + program.width() + clock.len() + 1);
    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(program, Style::default().fg(palette.muted)),
        Span::raw(" ".repeat(pad)),
        Span::styled(clock, Style::default().fg(palette.muted)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub(crate) fn draw_body(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let with_presets = !app.entries.is_empty();

    match layout_mode(area.width) {
        LayoutMode::Narrow => {
            let mut constraints = Vec::new();
            if with_presets {
                constraints.push(Constraint::Percentage(30));
            }
            constraints.push(Constraint::Percentage(35));
            constraints.push(Constraint::Min(3));
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(area);
            let mut rows = rows.iter().copied();
            if with_presets {
                if let Some(r) = rows.next() {
                    presets::draw(f, r, app, palette, false);
                }
            }
            if let Some(r) = rows.next() {
                options::draw(f, r, app, palette);
            }
            if let Some(r) = rows.next() {
                parameters::draw(f, r, app, palette);
            }
        }
        LayoutMode::Normal => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);
            if with_presets {
                let left = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .split(cols[0]);
                presets::draw(f, left[0], app, palette, false);
                options::draw(f, left[1], app, palette);
            } else {
                options::draw(f, cols[0], app, palette);
            }
            parameters::draw(f, cols[1], app, palette);
        }
        LayoutMode::Wide => {
            let constraints: &[Constraint] = if with_presets {
                &[
                    Constraint::Percentage(34),
                    Constraint::Percentage(28),
                    Constraint::Percentage(38),
                ]
            } else {
                &[Constraint::Percentage(40), Constraint::Percentage(60)]
            };
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(constraints.to_vec())
                .split(area);
            let mut cols = cols.iter().copied();
            if with_presets {
                if let Some(c) = cols.next() {
                    presets::draw(f, c, app, palette, true);
                }
            }
            if let Some(c) = cols.next() {
                options::draw(f, c, app, palette);
            }
            if let Some(c) = cols.next() {
                parameters::draw(f, c, app, palette);
            }
        }
    }
}

pub(crate) fn draw_preview(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let preview = Paragraph::new(app.form.command_preview())
        .style(Style::default().fg(palette.preview))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Command ")
                .border_style(Style::default().fg(palette.border)),
        );
    f.render_widget(preview, area);
}
