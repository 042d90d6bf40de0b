//! The single video screen opened from a share link.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::help::status_help;
use crate::views::card::Card;
use crate::views::common::{render_centered_message, render_error};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
    let theme = &app.theme;
    let Some(single) = &app.single else {
        return;
    };

    match app.store.get(&single.id) {
        Some(item) => {
            let card = Card {
                item: &item,
                header: "shared video".to_string(),
                active: true,
            };
            let lines = card.lines(app, chunks[0].height as usize, chunks[0].width);
            frame.render_widget(Paragraph::new(lines), chunks[0]);
        }
        None if single.loading => {
            let line = Line::from(vec![
                Span::styled(spinner_frame(None), theme.spinner_style()),
                Span::raw(" Loading video..."),
            ]);
            render_centered_message(frame, line, chunks[0]);
        }
        None => {
            let err = single.error.as_deref().unwrap_or("Video not found.");
            render_error(frame, &format!("{err}\n\nPress Esc to go to the feed."), theme, chunks[0]);
        }
    }

    let help_text = status_help(&app.view, app.modal.as_ref());
    let loading = format!("{} Loading...", spinner_frame(None));
    let mut bar = StatusBar::new(theme).label("Video").flash(app.flash.as_ref());
    if single.loading {
        bar = bar.loading(&loading);
    }
    bar.help(&help_text).render(frame, chunks[1]);
}
