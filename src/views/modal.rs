//! Popups drawn over the current view.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::app::{App, Modal};
use crate::feed::Gate;
use crate::help::modal_hint;
use crate::views::common::{centered_rect, dim_background, popup};
use crate::views::spinner::spinner_frame;
use crate::views::{comments, help_overlay};
use crate::wallet::{CURRENCY, format_amount};

const POPUP_WIDTH: u16 = 52;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(modal) = &app.modal else {
        return;
    };
    let hint = modal_hint(modal);
    match modal {
        Modal::Comments(state) => comments::render(frame, app, state, area),
        Modal::Gift {
            comment,
            input,
            balance,
            error,
            ..
        } => {
            let title = match comment {
                Some(target) => format!("Gift @{}", target.author),
                None => "Send a gift".to_string(),
            };
            let prompt = GiftPrompt {
                title: &title,
                input,
                balance: *balance,
                error: error.as_deref(),
            };
            render_gift(frame, app, &prompt, &hint, area)
        }
        Modal::Purchase { gate, pending } => {
            render_purchase(frame, app, gate, *pending, &hint, area)
        }
        Modal::Alert { title, message } => {
            render_alert(frame, app, title, message, &hint, area)
        }
        Modal::Help => help_overlay::render(frame, app, area),
    }
}

struct GiftPrompt<'a> {
    title: &'a str,
    input: &'a str,
    balance: Option<u64>,
    error: Option<&'a str>,
}

fn render_gift(frame: &mut Frame, app: &App, prompt: &GiftPrompt, hint: &str, area: Rect) {
    let theme = &app.theme;
    let GiftPrompt {
        title,
        input,
        balance,
        error,
    } = *prompt;
    dim_background(frame, area);
    let inner = popup(frame, theme, title, centered_rect(POPUP_WIDTH, 9, area));

    let balance_span = match balance {
        Some(b) => Span::styled(format_amount(b), Style::default().fg(theme.success)),
        None => Span::styled(format!("{} checking", spinner_frame(None)), theme.spinner_style()),
    };
    let mut lines = vec![
        Line::from(vec![Span::styled("Balance  ", theme.dim_style()), balance_span]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Amount   ", theme.dim_style()),
            Span::styled(
                format!("{CURRENCY}{input}"),
                Style::default()
                    .fg(theme.gifts)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("█", Style::default().fg(theme.foreground_dim)),
        ]),
        Line::raw(""),
    ];
    match error {
        Some(err) => lines.push(Line::styled(err.to_string(), theme.error_style())),
        None => lines.push(Line::raw("")),
    }
    lines.push(Line::styled(hint.to_string(), theme.dim_style()));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_purchase(
    frame: &mut Frame,
    app: &App,
    gate: &Gate,
    pending: bool,
    hint: &str,
    area: Rect,
) {
    let theme = &app.theme;
    dim_background(frame, area);
    let title = match gate {
        Gate::CreatorPass { .. } => "Creator pass",
        Gate::SeriesPurchase { .. } => "Unlock series",
        Gate::VideoPurchase { .. } | Gate::Open => "Unlock video",
    };
    let inner = popup(frame, theme, title, centered_rect(POPUP_WIDTH, 9, area));

    let mut lines = vec![
        Line::styled(gate.prompt(), Style::default().fg(theme.foreground)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Price  ", theme.dim_style()),
            Span::styled(format_amount(gate.price()), theme.locked_style()),
        ]),
        Line::raw(""),
    ];
    if pending {
        lines.push(Line::from(vec![
            Span::styled(spinner_frame(None), theme.spinner_style()),
            Span::raw(" Processing purchase..."),
        ]));
    } else {
        lines.push(Line::styled(hint.to_string(), theme.dim_style()));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_alert(
    frame: &mut Frame,
    app: &App,
    title: &str,
    message: &str,
    hint: &str,
    area: Rect,
) {
    let theme = &app.theme;
    dim_background(frame, area);
    let inner = popup(frame, theme, title, centered_rect(POPUP_WIDTH, 8, area));
    let lines = vec![
        Line::styled(message.to_string(), theme.error_style()),
        Line::raw(""),
        Line::styled(hint.to_string(), theme.dim_style()),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
