//! Key reference for the current screen, built from its keymap.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::help::view_help;
use crate::keys::view_keymap;
use crate::views::common::{centered_rect, dim_background, popup};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    dim_background(frame, area);

    let theme = &app.theme;
    let keymap = view_keymap(&app.view);
    let rows: Vec<(String, &str)> = view_help(&app.view)
        .expanded
        .iter()
        .filter_map(|item| item.format_for_overlay(&keymap))
        .collect();

    let keys_col = rows.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    let label_col = rows.iter().map(|(_, l)| l.width()).max().unwrap_or(0);
    // borders, horizontal padding and the gap between columns
    let width = (keys_col + label_col + 7) as u16;
    let height = rows.len() as u16 + 2;
    let inner = popup(
        frame,
        theme,
        "Keys",
        centered_rect(width.max(16), height, area),
    );

    let lines: Vec<Line> = rows
        .into_iter()
        .enumerate()
        .map(|(i, (keys, label))| {
            let row = if i % 2 == 1 {
                Style::default().bg(theme.selection_bg)
            } else {
                Style::default()
            };
            let pad = " ".repeat(keys_col.saturating_sub(keys.width()));
            Line::from(vec![
                Span::styled(format!("{pad}{keys}   "), theme.dim_style().patch(row)),
                Span::styled(
                    format!("{label:<label_col$}"),
                    Style::default().fg(theme.foreground).patch(row),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
