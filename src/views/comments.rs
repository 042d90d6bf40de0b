//! Comments sheet drawn over the bottom of the screen.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, CommentsState};
use crate::time::format_relative;
use crate::views::common::{popup, render_centered_message};
use crate::views::spinner::spinner_frame;

pub fn render(frame: &mut Frame, app: &App, state: &CommentsState, area: Rect) {
    let theme = &app.theme;
    // Keep the status bar row visible for the hint
    let area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let height = (area.height * 3 / 5).max(5).min(area.height);
    let sheet = Rect::new(area.x, area.bottom() - height, area.width, height);

    let title = if state.loading {
        "Comments".to_string()
    } else {
        format!("Comments ({})", state.comments.len())
    };
    let inner = popup(frame, theme, &title, sheet);

    if state.loading {
        let line = Line::from(vec![
            Span::styled(spinner_frame(None), theme.spinner_style()),
            Span::raw(" Loading comments..."),
        ]);
        render_centered_message(frame, line, inner);
        return;
    }
    if let Some(err) = &state.error {
        render_centered_message(frame, Line::styled(err.clone(), theme.error_style()), inner);
        return;
    }
    if state.comments.is_empty() {
        render_centered_message(
            frame,
            Line::styled("No comments yet.", theme.dim_style()),
            inner,
        );
        return;
    }

    let width = (inner.width as usize).max(1);
    let now = app.clock.now();
    let mut lines: Vec<Line> = Vec::new();
    for comment in state.comments.iter().skip(state.scroll) {
        let mut meta = vec![Span::styled(
            format!("@{}", comment.user.username),
            Style::default().fg(theme.creator),
        )];
        if let Some(ts) = comment.timestamp {
            meta.push(Span::styled(
                format!(" · {}", format_relative(ts.timestamp(), now)),
                theme.dim_style(),
            ));
        }
        if comment.upvotes > 0 {
            meta.push(Span::styled(
                format!(" · ▲{}", comment.upvotes),
                Style::default().fg(theme.likes),
            ));
        }
        if comment.replies > 0 {
            let noun = if comment.replies == 1 { "reply" } else { "replies" };
            meta.push(Span::styled(
                format!(" · {} {noun}", comment.replies),
                theme.dim_style(),
            ));
        }
        lines.push(Line::from(meta));
        for wrapped in textwrap::wrap(&comment.content, width) {
            lines.push(Line::styled(
                wrapped.into_owned(),
                Style::default().fg(theme.foreground),
            ));
        }
        lines.push(Line::raw(""));
        if lines.len() >= inner.height as usize {
            break;
        }
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
