//! Preset list with radio markers.

use presetui_core::presets::PresetOrigin;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::app::App;
use crate::panes::Focus;
use crate::theme::Palette;
use crate::widgets::pane_border;

pub(super) fn draw(f: &mut Frame, area: Rect, app: &App, palette: &Palette, inline_desc: bool) {
    let focused = app.focus == Focus::Presets;
    let selected = app.form.selected_preset();

    let items: Vec<ListItem> = app
        .entries
        .iter()
        .map(|entry| {
            let name = entry.preset.name.as_str();
            let marker = if selected == Some(name) { "●" } else { "○" };
            let mut spans = vec![
                Span::styled(format!("{marker} "), Style::default().fg(palette.accent)),
                Span::raw(name.to_string()),
            ];
            if entry.origin == PresetOrigin::Saved {
                spans.push(Span::styled(" *", Style::default().fg(palette.success)));
            }
            if inline_desc && !entry.preset.description.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", entry.preset.description),
                    Style::default().fg(palette.muted),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut title = format!(" Presets ({}) ", app.entries.len());
    if !inline_desc {
        if let Some(desc) = app
            .entries
            .get(app.preset_cursor)
            .map(|e| e.preset.description.as_str())
            .filter(|d| !d.is_empty())
        {
            title = format!(" Presets: {desc} ");
        }
    }

    let mut list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(pane_border(focused, palette)),
    );
    if focused {
        list = list
            .highlight_style(
                Style::default()
                    .bg(palette.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
    }

    let mut state = ListState::default().with_selected(Some(app.preset_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
