use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::feed::visible_entries;
use crate::help::status_help;
use crate::views::card::Card;
use crate::views::common::{render_centered_message, render_error};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(0),    // Cards
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_cards(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if app.feed.is_empty() {
        if let Some(err) = app.feed.error() {
            render_error(frame, &format!("{err}\n\nPress r to retry."), theme, area);
        } else if app.feed.should_show_spinner() {
            let line = Line::from(vec![
                Span::styled(spinner_frame(app.feed.loading_start()), theme.spinner_style()),
                Span::raw(" Loading videos..."),
            ]);
            render_centered_message(frame, line, area);
        } else {
            let line = Line::styled("No videos yet. Press r to refresh.", theme.dim_style());
            render_centered_message(frame, line, area);
        }
        return;
    }

    let item_height = app.item_height();
    let total = app.feed.len();
    let viewport = area.height as usize;
    for entry in visible_entries(app.scroll_rows, item_height, viewport, total) {
        let top = entry.index * item_height;
        let clipped = app.scroll_rows.saturating_sub(top);
        let offset = top.saturating_sub(app.scroll_rows);
        if offset >= viewport {
            break;
        }
        let rows = (item_height - clipped).min(viewport - offset);
        let rect = Rect::new(area.x, area.y + offset as u16, area.width, rows as u16);

        let card = Card {
            item: &app.feed.items()[entry.index],
            header: format!("{}/{}", entry.index + 1, total),
            active: entry.index == app.tracker.active(),
        };
        let lines = card.lines(app, item_height, area.width);
        frame.render_widget(Paragraph::new(lines).scroll((clipped as u16, 0)), rect);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let help_text = status_help(&app.view, app.modal.as_ref());

    let loading_text = if app.feed.is_loading_more() {
        Some(format!(
            "{} Loading more...",
            spinner_frame(app.feed.loading_start())
        ))
    } else if app.feed.is_loading() && !app.feed.is_empty() {
        Some(format!(
            "{} Refreshing...",
            spinner_frame(app.feed.loading_start())
        ))
    } else {
        None
    };
    let end_text = (!app.feed.has_more() && !app.feed.is_empty()).then_some("End of feed");

    let mut bar = StatusBar::new(theme).label("Feed").flash(app.flash.as_ref());
    if let Some(text) = loading_text.as_deref().or(end_text) {
        bar = bar.loading(text);
    }
    if !app.feed.is_empty() {
        bar = bar.position(app.tracker.active() + 1, app.feed.len());
    }
    let help_text = match app.feed.error() {
        Some(err) if !app.feed.is_empty() => format!("{err} (r to retry)"),
        _ => help_text,
    };
    bar.help(&help_text).render(frame, area);

    // Player backend on the far right
    let backend = format!(" {} ", app.player.backend_name());
    let width = backend.width() as u16;
    if area.width > width {
        let right = Rect::new(area.right() - width, area.y, width, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(backend, Style::default().fg(theme.foreground_dim))),
            right,
        );
    }
}
