//! "Save preset" dialog.

use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme::Palette;
use crate::widgets::centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Description,
}

/// What the dialog wants the app to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DialogAction {
    None,
    Cancel,
    Submit { name: String, description: String },
}

#[derive(Debug)]
pub(crate) struct SaveDialog {
    name: String,
    description: String,
    field: Field,
    error: Option<String>,
}

impl SaveDialog {
    /// Open with the name pre-filled from the active preset, if any.
    pub(crate) fn new(current: Option<&str>) -> Self {
        Self {
            name: current.unwrap_or_default().to_string(),
            description: String::new(),
            field: Field::Name,
            error: None,
        }
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> DialogAction {
        match code {
            KeyCode::Esc => return DialogAction::Cancel,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.field = match self.field {
                    Field::Name => Field::Description,
                    Field::Description => Field::Name,
                };
            }
            KeyCode::Enter if self.field == Field::Name => {
                self.field = Field::Description;
            }
            KeyCode::Enter => {
                if self.name.trim().is_empty() {
                    self.error = Some("Name is required".to_string());
                    self.field = Field::Name;
                } else {
                    return DialogAction::Submit {
                        name: self.name.trim().to_string(),
                        description: self.description.trim().to_string(),
                    };
                }
            }
            KeyCode::Backspace => {
                self.active_mut().pop();
            }
            KeyCode::Char(c) => {
                self.error = None;
                self.active_mut().push(c);
            }
            _ => {}
        }
        DialogAction::None
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
        }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, palette: &Palette) {
        let popup = centered_rect(60, 40, area);

        let field_line = |label: &str, value: &str, field: Field| {
            let active = self.field == field;
            let style = if active {
                Style::default()
                    .fg(palette.focus)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let cursor = if active { "▏" } else { "" };
            Line::from(vec![
                Span::styled(format!("{label:<13}"), style),
                Span::raw(format!("{value}{cursor}")),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field_line("Name:", &self.name, Field::Name),
            field_line("Description:", &self.description, Field::Description),
            Line::from(""),
        ];
        match &self.error {
            Some(err) => lines.push(Line::styled(err.clone(), Style::default().fg(palette.error))),
            None => lines.push(Line::styled(
                "Enter: next/save   Tab: switch field   Esc: cancel",
                Style::default().fg(palette.muted),
            )),
        }

        let dialog = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Save preset ")
                    .border_style(Style::default().fg(palette.focus)),
            )
            .style(Style::default().bg(palette.background).fg(palette.foreground));

        f.render_widget(Clear, popup);
        f.render_widget(dialog, popup);
    }
}
