use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::Line,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Render an error message in a bordered block.
pub fn render_error(frame: &mut Frame, error: &str, theme: &Theme, area: Rect) {
    let widget = Paragraph::new(error)
        .style(theme.error_style())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title("Error"),
        );
    frame.render_widget(widget, area);
}

/// Render a single message centered vertically in `area`.
pub fn render_centered_message(frame: &mut Frame, line: Line<'static>, area: Rect) {
    let y = area.y + area.height / 2;
    let row = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
    frame.render_widget(Paragraph::new(line.centered()), row);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Dim everything already drawn in `area`.
pub fn dim_background(frame: &mut Frame, area: Rect) {
    let buf = frame.buffer_mut();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = &mut buf[(x, y)];
            cell.set_style(cell.style().add_modifier(Modifier::DIM));
        }
    }
}

/// Clear `area` and draw a titled popup frame, returning the inner area.
pub fn popup(frame: &mut Frame, theme: &Theme, title: &str, area: Rect) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" {title} "))
        .title_style(theme.title_style())
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}
