use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::help::status_help;
use crate::views::common::render_error;
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;
use crate::wallet::{MIN_WITHDRAWAL, format_amount};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
    let theme = &app.theme;

    match (&app.wallet.wallet, &app.wallet.error) {
        (None, Some(err)) => render_error(frame, err, theme, chunks[0]),
        (wallet, _) => {
            let balance = match wallet {
                Some(w) => Span::styled(
                    format_amount(w.balance),
                    Style::default()
                        .fg(theme.success)
                        .add_modifier(Modifier::BOLD),
                ),
                None => Span::styled(
                    format!("{} loading", spinner_frame(None)),
                    theme.spinner_style(),
                ),
            };
            let mut lines = vec![
                Line::from(vec![Span::styled("Balance  ", theme.dim_style()), balance]),
                Line::raw(""),
            ];
            if let Some(user) = app.client.session().user() {
                lines.push(Line::from(vec![
                    Span::styled("Account  ", theme.dim_style()),
                    Span::styled(format!("@{}", user.username), Style::default().fg(theme.creator)),
                ]));
                lines.push(Line::raw(""));
            }
            lines.push(Line::styled(
                format!(
                    "Withdrawals start at {}. Run `vidfeed wallet withdraw <amount>` to request one.",
                    format_amount(MIN_WITHDRAWAL)
                ),
                theme.dim_style(),
            ));
            if let Some(err) = &app.wallet.error {
                lines.push(Line::raw(""));
                lines.push(Line::styled(err.clone(), theme.error_style()));
            }

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Wallet ")
                .title_style(theme.title_style())
                .padding(Padding::uniform(1));
            frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);
        }
    }

    let help_text = status_help(&app.view, app.modal.as_ref());
    let loading = format!("{} Loading...", spinner_frame(None));
    let mut bar = StatusBar::new(theme).label("Wallet").flash(app.flash.as_ref());
    if app.wallet.loading {
        bar = bar.loading(&loading);
    }
    bar.help(&help_text).render(frame, chunks[1]);
}
