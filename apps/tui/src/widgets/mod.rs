//! Reusable TUI widgets.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::theme::Palette;

/// Bottom status bar.
pub(crate) fn status_bar<'a>(msg: &'a str, palette: &Palette) -> Paragraph<'a> {
    Paragraph::new(format!(" {msg}"))
        .style(Style::default().bg(palette.status_bg).fg(palette.status_fg))
}

/// One-line key reference under the status bar.
pub(crate) fn key_hints(editing: bool, palette: &Palette) -> Paragraph<'static> {
    let pairs: &[(&str, &str)] = if editing {
        &[("Enter/Esc", "done"), ("Ctrl-U", "clear"), ("Tab", "next field")]
    } else {
        &[
            ("Tab", "pane"),
            ("Enter", "apply/edit"),
            ("Space", "toggle"),
            ("r", "run"),
            ("c", "copy"),
            ("s", "save"),
            ("t", "theme"),
            ("?", "help"),
            ("q", "quit"),
        ]
    };

    let key = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(palette.muted);

    let spans: Vec<Span> = pairs
        .iter()
        .flat_map(|(k, v)| {
            [
                Span::styled(format!(" {k}"), key),
                Span::styled(format!(" {v} "), text),
            ]
        })
        .collect();
    Paragraph::new(Line::from(spans))
}

/// Helper to create a centered rect of `percent_x` × `percent_y` of `r`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Border style for a pane, highlighted when it has focus.
pub(crate) fn pane_border(focused: bool, palette: &Palette) -> Style {
    if focused {
        Style::default()
            .fg(palette.focus)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 10);
    }
}
