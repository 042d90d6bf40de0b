mod builtin;
mod detect;

pub use builtin::{all_themes, by_name, default_for_variant};
pub use detect::detect_terminal_theme;

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub variant: ThemeVariant,
    pub foreground: Color,
    pub foreground_dim: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub video_title: Color,
    pub creator: Color,
    pub likes: Color,
    pub gifts: Color,
    pub counter: Color,
    pub locked: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub spinner: Color,
}

impl Theme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.foreground_dim)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.video_title)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn spinner_style(&self) -> Style {
        Style::default().fg(self.spinner)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .bg(self.status_bar_bg)
            .fg(self.status_bar_fg)
    }

    pub fn locked_style(&self) -> Style {
        Style::default()
            .fg(self.locked)
            .add_modifier(Modifier::BOLD)
    }
}
