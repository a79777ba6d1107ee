//! Parameter pane: free-text inputs and select choices.

use presetui_shared::ParameterOption;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::panes::Focus;
use crate::theme::Palette;
use crate::widgets::pane_border;

pub(super) fn draw(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let focused = app.focus == Focus::Parameters;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Parameters ")
        .border_style(pane_border(focused, palette));

    let params = &app.form.spec().parameters;
    if params.is_empty() {
        let empty = Paragraph::new("No parameters")
            .style(Style::default().fg(palette.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let label_width = params
        .iter()
        .map(|p| p.label().width())
        .max()
        .unwrap_or(0);

    let items: Vec<ListItem> = params
        .iter()
        .enumerate()
        .map(|(i, param)| {
            let value = app.form.value_at(i);
            let editing = focused && app.editing && i == app.param_cursor;
            let gap = label_width.saturating_sub(param.label().width()) + 2;
            let label = Span::raw(format!("{}{}", param.label(), " ".repeat(gap)));

            let value_span = match param {
                ParameterOption::Select(_) => Span::styled(
                    format!("< {value} >"),
                    Style::default().fg(palette.accent),
                ),
                ParameterOption::Input(_) if editing => Span::styled(
                    format!("{value}▏"),
                    Style::default()
                        .fg(palette.warning)
                        .add_modifier(Modifier::BOLD),
                ),
                ParameterOption::Input(input) if value.is_empty() => Span::styled(
                    if input.placeholder.is_empty() {
                        "-".to_string()
                    } else {
                        input.placeholder.clone()
                    },
                    Style::default()
                        .fg(palette.muted)
                        .add_modifier(Modifier::ITALIC),
                ),
                ParameterOption::Input(_) => Span::raw(value.to_string()),
            };

            ListItem::new(Line::from(vec![label, value_span]))
        })
        .collect();

    let mut list = List::new(items).block(block);
    if focused {
        list = list
            .highlight_style(Style::default().bg(palette.highlight))
            .highlight_symbol("▸ ");
    }
    let mut state = ListState::default().with_selected(Some(app.param_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
