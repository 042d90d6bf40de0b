use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::theme::Theme;

fn field(theme: &Theme, name: &'static str, value: String) -> [Span<'static>; 2] {
    [
        Span::styled(format!("{name} "), theme.dim_style()),
        Span::styled(format!("{value}  "), Style::default().fg(theme.foreground)),
    ]
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let player = app.player.adapter();

    let mut status = Vec::new();
    status.extend(field(
        theme,
        "player",
        format!(
            "{} {:?} {}",
            app.player.backend_name(),
            player.state(),
            player.current_id().unwrap_or("-")
        ),
    ));
    status.extend(field(
        theme,
        "feed",
        format!("{} next p{}", app.feed.len(), app.feed.next_page()),
    ));
    status.extend(field(theme, "gen", app.generation.to_string()));
    status.extend(field(theme, "cached", app.store.len().to_string()));

    let tasks = &app.debug.running_tasks;
    let mut lines = vec![Line::from(status)];
    lines.extend(tasks.iter().map(|task| {
        Line::from(vec![
            Span::styled(format!("  #{} ", task.id), theme.dim_style()),
            Span::styled(task.description.clone(), Style::default().fg(theme.warning)),
            Span::styled(
                format!(" {:.1?}", task.started_at.elapsed()),
                Style::default().fg(theme.counter),
            ),
        ])
    }));

    // Newest log lines in whatever room is left
    let room = (area.height.saturating_sub(2) as usize).saturating_sub(lines.len());
    lines.extend(
        app.debug
            .log
            .iter()
            .rev()
            .take(room)
            .map(|entry| Line::styled(format!("  {}", entry.message), theme.dim_style())),
    );

    let block = Block::default()
        .title(format!(" Debug ({} running) ", tasks.len()))
        .borders(Borders::ALL)
        .border_style(theme.dim_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
