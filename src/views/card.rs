//! A video rendered as a full-height card, shared by the feed and the
//! single video screen.

use std::time::{Duration, Instant};

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::api::VideoItem;
use crate::app::App;
use crate::feed::{Gate, Overlay, PlayerState, compact_count};
use crate::time::format_relative;
use crate::views::spinner::spinner_frame;

const MAX_DESCRIPTION_LINES: usize = 3;
const SIDE_PADDING: usize = 2;

pub struct Card<'a> {
    pub item: &'a VideoItem,
    /// Text for the rule at the top of the card, e.g. "2/6".
    pub header: String,
    /// Whether this card owns the player.
    pub active: bool,
}

impl Card<'_> {
    /// Lays the card out into exactly `height` lines (fewer when too short
    /// for the content).
    pub fn lines(&self, app: &App, height: usize, width: u16) -> Vec<Line<'static>> {
        let theme = &app.theme;
        let item = self.item;
        let gate = app.access.decide(item);
        let content_width = (width as usize).saturating_sub(SIDE_PADDING * 2).max(1);
        let pad = " ".repeat(SIDE_PADDING);

        let rule = format!("── {} ", self.header);
        let mut top = vec![
            Line::styled(
                format!("{rule:─<width$}", width = width as usize),
                theme.border_style(),
            ),
            Line::from(vec![
                Span::raw(pad.clone()),
                Span::styled(item.heading(), theme.title_style()),
            ]),
            self.creator_line(app, &pad),
        ];
        top.push(Line::raw(""));

        let mut bottom: Vec<Line<'static>> = Vec::new();
        if let Some(desc) = item.description.as_deref().filter(|d| !d.trim().is_empty()) {
            for wrapped in textwrap::wrap(desc, content_width)
                .into_iter()
                .take(MAX_DESCRIPTION_LINES)
            {
                bottom.push(Line::styled(
                    format!("{pad}{wrapped}"),
                    Style::default().fg(theme.foreground),
                ));
            }
            bottom.push(Line::raw(""));
        }
        bottom.push(self.stats_line(app, &pad));

        let stage = self.stage_line(app, &gate);
        let used = top.len() + bottom.len() + 1;
        let free = height.saturating_sub(used);
        let before = free / 2;

        let mut lines = top;
        lines.extend(std::iter::repeat_n(Line::raw(""), before));
        lines.push(stage);
        lines.extend(std::iter::repeat_n(Line::raw(""), free - before));
        lines.extend(bottom);
        lines
    }

    fn creator_line(&self, app: &App, pad: &str) -> Line<'static> {
        let theme = &app.theme;
        let item = self.item;
        let mut spans = vec![
            Span::raw(pad.to_string()),
            Span::styled(
                format!("@{}", item.created_by.username),
                Style::default().fg(theme.creator),
            ),
        ];
        if item.is_following_creator {
            spans.push(Span::styled(
                " · following",
                Style::default().fg(theme.success),
            ));
        }
        if let Some(created) = item.created_at {
            spans.push(Span::styled(
                format!(" · {}", format_relative(created.timestamp(), app.clock.now())),
                theme.dim_style(),
            ));
        }
        Line::from(spans)
    }

    fn stats_line(&self, app: &App, pad: &str) -> Line<'static> {
        let theme = &app.theme;
        let stats = self.item.stats;
        let counter = |icon: &str, n: u64, style: Style| {
            [
                Span::styled(format!("{icon} "), style),
                Span::styled(compact_count(n), Style::default().fg(theme.counter)),
                Span::raw("   "),
            ]
        };
        let mut spans = vec![Span::raw(pad.to_string())];
        spans.extend(counter("♥", stats.likes, Style::default().fg(theme.likes)));
        spans.extend(counter("↗", stats.shares, theme.dim_style()));
        spans.extend(counter("✦", stats.gifts, Style::default().fg(theme.gifts)));
        spans.extend(counter("✎", stats.comments, theme.dim_style()));
        Line::from(spans)
    }

    /// The middle of the card: lock notice or playback state.
    fn stage_line(&self, app: &App, gate: &Gate) -> Line<'static> {
        let theme = &app.theme;
        if !gate.is_open() {
            return Line::from(vec![
                Span::styled(format!("🔒 {}", gate.short_label()), theme.locked_style()),
                Span::styled(
                    format!(" · {} · Space to unlock", crate::wallet::format_amount(gate.price())),
                    theme.dim_style(),
                ),
            ])
            .centered();
        }

        let player = app.player.adapter();
        let is_current = player.current_id() == Some(self.item.id.as_str());
        if !self.active || !is_current {
            return Line::styled("▷", theme.dim_style()).centered();
        }

        let big = Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD);
        let text = match player.overlay(Instant::now()) {
            Overlay::Play => "▶".to_string(),
            Overlay::Pause => "⏸".to_string(),
            Overlay::Spinner => format!("{} buffering", spinner_frame(None)),
            Overlay::None => match player.state() {
                PlayerState::Playing => format!("▶ {}", format_position(player.position())),
                PlayerState::Paused => "⏸ paused".to_string(),
                PlayerState::Loading => format!("{} loading", spinner_frame(None)),
                PlayerState::Ready => "▷ ready".to_string(),
                PlayerState::Idle | PlayerState::Released => "▷".to_string(),
            },
        };
        Line::styled(text, big).centered()
    }
}

fn format_position(pos: Duration) -> String {
    let secs = pos.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
