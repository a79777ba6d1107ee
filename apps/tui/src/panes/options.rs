//! Checkbox pane.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;
use crate::panes::Focus;
use crate::theme::Palette;
use crate::widgets::pane_border;

pub(super) fn draw(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let focused = app.focus == Focus::Options;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Options ")
        .border_style(pane_border(focused, palette));

    let checkboxes = &app.form.spec().checkboxes;
    if checkboxes.is_empty() {
        let empty = Paragraph::new("No options")
            .style(Style::default().fg(palette.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = checkboxes
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let on = app.form.checkbox_at(i);
            let mark = if on { "[x]" } else { "[ ]" };
            let mark_style = if on {
                Style::default().fg(palette.success)
            } else {
                Style::default().fg(palette.muted)
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, mark_style),
                Span::raw(format!(" {}", opt.label)),
                Span::styled(format!(" ({})", opt.arg), Style::default().fg(palette.muted)),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(block);
    if focused {
        list = list
            .highlight_style(Style::default().bg(palette.highlight))
            .highlight_symbol("▸ ");
    }
    let mut state = ListState::default().with_selected(Some(app.option_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
