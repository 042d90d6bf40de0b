//! A creator's profile: header, tab strip and the selected tab's videos.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::api::{Profile, ProfileTab};
use crate::app::{App, ProfileState};
use crate::feed::compact_count;
use crate::help::status_help;
use crate::theme::Theme;
use crate::views::common::{render_centered_message, render_error};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;
use crate::wallet::format_amount;

const HEADER_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(1), // Tabs
        Constraint::Min(0),    // Videos
        Constraint::Length(1), // Status bar
    ])
    .split(area);
    let theme = &app.theme;
    let Some(state) = &app.profile else {
        return;
    };

    render_header(frame, theme, state, chunks[0]);
    frame.render_widget(Paragraph::new(tab_line(theme, state.tab)), chunks[1]);
    render_videos(frame, theme, state, chunks[2]);

    let help_text = status_help(&app.view, app.modal.as_ref());
    let help_text = match state.videos.error() {
        Some(err) if !state.videos.is_empty() => format!("{err} (r to retry)"),
        _ => help_text,
    };
    let loading = format!("{} Loading...", spinner_frame(state.videos.loading_start()));
    let mut bar = StatusBar::new(theme).label("Profile").flash(app.flash.as_ref());
    if state.loading || state.videos.is_loading() {
        bar = bar.loading(&loading);
    }
    if !state.videos.is_empty() {
        bar = bar.position(state.selected + 1, state.videos.len());
    }
    bar.help(&help_text).render(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, theme: &Theme, state: &ProfileState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .padding(Padding::horizontal(1));
    let Some(profile) = &state.profile else {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        match &state.error {
            Some(err) => {
                let line = Line::styled(err.clone(), theme.error_style());
                render_centered_message(frame, line, inner);
            }
            None => {
                let line = Line::from(vec![
                    Span::styled(spinner_frame(None), theme.spinner_style()),
                    Span::raw(" Loading profile..."),
                ]);
                render_centered_message(frame, line, inner);
            }
        }
        return;
    };

    let block = block
        .title(format!(" {} ", profile.display_name()))
        .title_style(theme.title_style());
    frame.render_widget(
        Paragraph::new(header_lines(theme, profile))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn header_lines(theme: &Theme, profile: &Profile) -> Vec<Line<'static>> {
    let mut handle = vec![Span::styled(
        format!("@{}", profile.username),
        Style::default().fg(theme.creator),
    )];
    if profile.verified {
        handle.push(Span::styled(" ✓ verified", Style::default().fg(theme.primary)));
    }

    let follow = if profile.is_following {
        Span::styled("Following", Style::default().fg(theme.success))
    } else {
        Span::styled("Follow (f)", Style::default().fg(theme.foreground))
    };
    let mut stats = vec![
        Span::styled(
            compact_count(profile.followers),
            Style::default()
                .fg(theme.counter)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" followers   ", theme.dim_style()),
        follow,
    ];
    if profile.creator_pass_price > 0 {
        stats.push(Span::styled("   Creator pass ", theme.dim_style()));
        stats.push(Span::styled(
            format!("{}/month (b)", format_amount(profile.creator_pass_price)),
            theme.locked_style(),
        ));
    }

    let mut lines = vec![Line::from(handle), Line::from(stats)];
    if let Some(bio) = &profile.bio {
        lines.push(Line::styled(bio.clone(), Style::default().fg(theme.foreground)));
    }
    if let Some(site) = &profile.website {
        lines.push(Line::styled(site.clone(), theme.dim_style()));
    }
    lines
}

fn tab_line(theme: &Theme, active: ProfileTab) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for tab in ProfileTab::ALL {
        let style = if tab == active {
            Style::default()
                .fg(theme.video_title)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            theme.dim_style()
        };
        spans.push(Span::styled(tab.label(), style));
        spans.push(Span::raw("   "));
    }
    spans.push(Span::styled("Tab to switch", theme.dim_style()));
    Line::from(spans)
}

fn render_videos(frame: &mut Frame, theme: &Theme, state: &ProfileState, area: Rect) {
    let videos = &state.videos;
    if videos.is_empty() {
        if let Some(err) = videos.error() {
            render_error(frame, &format!("{err}\n\nPress r to retry."), theme, area);
        } else if videos.is_loading() {
            let line = Line::from(vec![
                Span::styled(spinner_frame(videos.loading_start()), theme.spinner_style()),
                Span::raw(" Loading videos..."),
            ]);
            render_centered_message(frame, line, area);
        } else {
            let line = Line::styled("Nothing here yet.", theme.dim_style());
            render_centered_message(frame, line, area);
        }
        return;
    }

    // Keep the selection on screen
    let rows = (area.height as usize).max(1);
    let first = state.selected.saturating_sub(rows - 1);
    let lines: Vec<Line> = videos
        .items()
        .iter()
        .enumerate()
        .skip(first)
        .take(rows)
        .map(|(i, item)| {
            let selected = i == state.selected;
            let marker = if selected { "▶ " } else { "  " };
            let title = if selected {
                theme.title_style()
            } else {
                Style::default().fg(theme.foreground)
            };
            let mut row = Style::default();
            if selected {
                row = row.bg(theme.selection_bg);
            }
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.primary)),
                Span::styled(item.heading(), title),
                Span::styled(
                    format!("  ♥ {}", compact_count(item.stats.likes)),
                    Style::default().fg(theme.likes),
                ),
            ])
            .style(row)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}
